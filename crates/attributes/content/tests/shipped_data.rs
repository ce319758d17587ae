use std::path::PathBuf;

use attribute_content::{ContentFactory, FileRecordStore, RecordStore, SavedCharacter};
use attribute_core::{TemplateOracle, TemplateRegistry};

fn factory() -> ContentFactory {
    ContentFactory::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"))
}

fn value(registry: &TemplateRegistry, sheet: &attribute_core::CharacterAttributes, name: &str) -> i32 {
    let id = registry.resolve_name(name).unwrap().id();
    sheet.try_get_attribute(id).unwrap().final_value()
}

#[test]
fn hero_derives_from_primary_attributes() {
    let factory = factory();
    let registry = factory.load_templates().unwrap();
    let config = factory.load_config().unwrap();
    let sheet = factory.build_character(&registry, "hero", config).unwrap();

    assert_eq!(value(&registry, &sheet, "Health"), 100);
    assert_eq!(value(&registry, &sheet, "Mana"), 28);
    assert_eq!(value(&registry, &sheet, "Attack"), 21);
    assert_eq!(value(&registry, &sheet, "Defense"), 9);
    assert_eq!(value(&registry, &sheet, "CritChance"), 8);
}

#[test]
fn golem_survives_a_save_and_reload() {
    let factory = factory();
    let registry = factory.load_templates().unwrap();
    let health = registry.resolve_name("Health").unwrap().id();
    let vitality = registry.resolve_name("Vitality").unwrap().id();

    let mut sheet = factory
        .build_character(&registry, "golem", factory.load_config().unwrap())
        .unwrap();
    sheet.set_value(vitality, 40).unwrap();
    sheet.add_current(health, -150).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let mut store = FileRecordStore::new(dir.path()).unwrap();
    store.save(&SavedCharacter::capture("golem", &sheet)).unwrap();

    let mut reloaded = factory
        .build_character(&registry, "golem", factory.load_config().unwrap())
        .unwrap();
    store
        .load("golem")
        .unwrap()
        .unwrap()
        .restore(&mut reloaded)
        .unwrap();

    assert_eq!(reloaded.records(), sheet.records());
    let health = reloaded.try_get_resource_attribute(health).unwrap();
    assert_eq!(health.final_value(), 400);
    assert_eq!(health.current_value(), Some(200));
}
