// Licensed under the Apache-2.0 license

#![cfg_attr(target_os = "none", no_std)]

/// Locates the eFUSE blocks in the physical address map.
/// These are the defaults that can be overridden and provided to the guard and host tools.
#[repr(C)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EfuseMemoryMap {
    /// Base of the eFUSE cache (the shadow copy of the fuse array).
    pub cache_offset: u32,
    pub cache_size: u32,
    /// Base of the eFUSE controller (status, ISR and CRC registers).
    pub ctrl_offset: u32,
    pub ctrl_size: u32,
}

pub const VERSAL_NET_MEMORY_MAP: EfuseMemoryMap = EfuseMemoryMap {
    cache_offset: 0xF125_0000,
    cache_size: 0x1000,
    ctrl_offset: 0xF124_0000,
    ctrl_size: 0x1000,
};

impl Default for EfuseMemoryMap {
    fn default() -> Self {
        VERSAL_NET_MEMORY_MAP
    }
}

impl EfuseMemoryMap {
    /// Returns true if `offset` falls inside the cache block.
    pub fn cache_contains(&self, offset: u32) -> bool {
        offset < self.cache_size
    }

    /// Returns true if `offset` falls inside the controller block.
    pub fn ctrl_contains(&self, offset: u32) -> bool {
        offset < self.ctrl_size
    }

    #[cfg(not(target_os = "none"))]
    pub fn hash_map(&self) -> std::collections::HashMap<String, String> {
        let mut map = std::collections::HashMap::new();
        map.insert(
            "EFUSE_CACHE_OFFSET".to_string(),
            format!("0x{:x}", self.cache_offset),
        );
        map.insert(
            "EFUSE_CACHE_SIZE".to_string(),
            format!("0x{:x}", self.cache_size),
        );
        map.insert(
            "EFUSE_CTRL_OFFSET".to_string(),
            format!("0x{:x}", self.ctrl_offset),
        );
        map.insert(
            "EFUSE_CTRL_SIZE".to_string(),
            format!("0x{:x}", self.ctrl_size),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_versal_net() {
        let map = EfuseMemoryMap::default();
        assert_eq!(map, VERSAL_NET_MEMORY_MAP);
        assert_eq!(map.cache_offset, 0xF125_0000);
        assert_eq!(map.ctrl_offset, 0xF124_0000);
    }

    #[test]
    fn test_cache_contains() {
        let map = EfuseMemoryMap::default();
        assert!(map.cache_contains(0x1E8));
        assert!(!map.cache_contains(0x1000));
        assert!(map.ctrl_contains(0x64));
        assert!(!map.ctrl_contains(0x2000));
    }

    #[test]
    fn test_hash_map() {
        let map = VERSAL_NET_MEMORY_MAP.hash_map();
        assert_eq!(map["EFUSE_CACHE_OFFSET"], "0xf1250000");
        assert_eq!(map["EFUSE_CTRL_OFFSET"], "0xf1240000");
        assert_eq!(map.len(), 4);
    }
}
