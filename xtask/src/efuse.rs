// Licensed under the Apache-2.0 license

use crate::Request;
use anyhow::{bail, Context, Result};
use nvm_config::EfuseMemoryMap;
use nvm_testing_common::{EfuseSnapshot, FakeEfuse};
use std::path::Path;
use xilnvm::{EfuseGuard, EfuseResult, Iv, IV_LEN_IN_WORDS};

/// Runs `request` against the device described by `snapshot`. Returns
/// whether the write may proceed.
pub(crate) fn validate(snapshot: &Path, request: &Request) -> Result<bool> {
    let outcome = check(snapshot, request)?;
    match outcome {
        Ok(()) => println!("{request:?}: write allowed"),
        Err(err) => println!("{request:?}: {err} (0x{:x})", err.code()),
    }
    Ok(outcome.is_ok())
}

fn check(snapshot: &Path, request: &Request) -> Result<EfuseResult<()>> {
    let state = EfuseSnapshot::load(snapshot)
        .with_context(|| format!("loading {}", snapshot.display()))?;
    let efuse = FakeEfuse::from_snapshot(EfuseMemoryMap::default(), &state)
        .with_context(|| format!("checking {}", snapshot.display()))?;
    let guard = EfuseGuard::new(&efuse);

    let outcome = match request {
        Request::AesKey { key_type } => guard.validate_aes_key_write_req(*key_type),
        Request::Ppk { ppk_type } => guard.validate_ppk_hash_write_req(*ppk_type),
        Request::Iv { iv_type, iv } => guard.validate_iv_write_req(*iv_type, &to_iv(iv)?),
    };
    Ok(outcome)
}

fn to_iv(words: &[u32]) -> Result<Iv> {
    if words.len() != IV_LEN_IN_WORDS {
        bail!("IV needs {IV_LEN_IN_WORDS} words, got {}", words.len());
    }
    let mut iv = Iv::default();
    iv.copy_from_slice(words);
    Ok(iv)
}

pub(crate) fn template(out: &Path) -> Result<()> {
    FakeEfuse::blank()
        .snapshot()
        .save(out)
        .with_context(|| format!("writing {}", out.display()))?;
    println!("Wrote blank device snapshot to {}", out.display());
    Ok(())
}

pub(crate) fn print_memory_map() {
    let map = EfuseMemoryMap::default().hash_map();
    let mut keys: Vec<_> = map.keys().collect();
    keys.sort();
    for key in keys {
        println!("{key} = {}", map[key]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xilnvm::{AesKeyType, EfuseError, IvType};

    #[test]
    fn test_template_then_validate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.json");
        template(&path).unwrap();

        assert_eq!(
            check(&path, &Request::AesKey { key_type: 0 }).unwrap(),
            Ok(())
        );
        assert_eq!(
            check(&path, &Request::Ppk { ppk_type: 3 }).unwrap(),
            Err(EfuseError::InvalidParam)
        );
        assert!(validate(&path, &Request::Ppk { ppk_type: 2 }).unwrap());
    }

    #[test]
    fn test_programmed_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.json");
        let efuse = FakeEfuse::blank();
        efuse.program_cache_words(0x180, &[0b1010, 0, 0]);
        efuse.set_ctrl_register(0x60, 0xdead_beef);
        efuse.snapshot().save(&path).unwrap();

        let iv = Request::Iv {
            iv_type: 0,
            iv: vec![0b1000, 0, 0],
        };
        assert_eq!(
            check(&path, &iv).unwrap(),
            Err(EfuseError::BitCannotRevert(IvType::MetaHeaderIvRange.into()))
        );
        assert!(!validate(&path, &iv).unwrap());
        assert_eq!(
            check(&path, &Request::AesKey { key_type: 1 }).unwrap(),
            Err(EfuseError::AlreadyProgrammed(AesKeyType::UserKey0.into()))
        );
    }

    #[test]
    fn test_bad_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(check(&missing, &Request::Ppk { ppk_type: 0 }).is_err());

        let misaligned = dir.path().join("misaligned.json");
        std::fs::write(&misaligned, r#"{ "cache": { "258": 1 } }"#).unwrap();
        assert!(check(&misaligned, &Request::Ppk { ppk_type: 0 }).is_err());
    }

    #[test]
    fn test_iv_word_count() {
        assert!(to_iv(&[1, 2]).is_err());
        assert_eq!(to_iv(&[1, 2, 3]).unwrap(), [1, 2, 3]);
    }
}
