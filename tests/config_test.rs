//! Configuration files driving a snapshot scan

use memory_mosaic::config::{validate_config, ConfigError, ConfigLoader};
use memory_mosaic::memory::{RegionPointerValidator, SnapshotMemory, SnapshotRegion};
use memory_mosaic::{Address, MemoryAccess, TargetArch};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_describes_loadable_snapshot() {
    let dir = TempDir::new().unwrap();
    let module = dir.path().join("client.bin");
    let heap = dir.path().join("heap.bin");
    fs::write(&module, vec![0u8; 0x40]).unwrap();
    fs::write(&heap, vec![0u8; 0x10]).unwrap();

    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            r#"
            [target]
            dump = '{}'
            base = "0x400000"
            module_name = "client.dll"
            architecture = "x86"

            [[target.regions]]
            path = '{}'
            base = "0x900000"

            [scanner]
            deduplicate = false

            [output]
            directory = "results"
            "#,
            module.display(),
            heap.display()
        ),
    )
    .unwrap();

    let config = ConfigLoader::new(&config_path).load().unwrap();
    validate_config(&config).unwrap();
    assert_eq!(config.target.module_name.as_deref(), Some("client.dll"));
    assert_eq!(config.scanner.effective_step(config.target.architecture), 4);
    assert!(!config.scanner.deduplicate);

    let mut memory = SnapshotMemory::with_module(
        config.target.architecture,
        SnapshotRegion::from_file(&config.target.dump, config.target.base_address().unwrap())
            .unwrap(),
    );
    for region in &config.target.regions {
        memory.add_region(
            SnapshotRegion::from_file(&region.path, region.base_address().unwrap()).unwrap(),
        );
    }

    let range = memory.module_range().unwrap();
    assert_eq!(memory.arch(), TargetArch::X86);
    assert_eq!(range.base, Address::new(0x40_0000));
    assert_eq!(range.size, 0x40);

    let validator = RegionPointerValidator::from_snapshot(&memory);
    assert_eq!(validator.region_count(), 2);
}

#[test]
fn test_invalid_step_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[scanner]\nstep = 0\n").unwrap();

    let config = ConfigLoader::new(&config_path).load().unwrap();
    assert!(matches!(
        validate_config(&config),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_saved_defaults_round_trip() {
    let dir = TempDir::new().unwrap();
    let loader = ConfigLoader::new(dir.path().join("config.toml"));

    let config = loader.load_or_default().unwrap();
    loader.save(&config).unwrap();
    let reloaded = loader.load().unwrap();

    assert_eq!(reloaded.target.base, config.target.base);
    assert_eq!(reloaded.output.addresses_file, config.output.addresses_file);
    assert_eq!(reloaded.scanner.step, None);
    validate_config(&reloaded).unwrap();
}
