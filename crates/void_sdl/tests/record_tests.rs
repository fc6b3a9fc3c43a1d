//! Integration tests for void_sdl
//!
//! Tests descriptor loading from disk, record defaults and blob round trips

use void_sdl::*;

const AGE_SDL: &str = r#"
# Age state
STATEDESC Lock
{
    VERSION 1
    VAR INT      code[1]     DEFAULT=1234
    VAR CHAR     letter[1]   DEFAULT=A
}

STATEDESC Door
{
    VERSION 1
    VAR BOOL     open[1]
}

STATEDESC Door
{
    VERSION 2
    VAR BOOL       open[1]      DEFAULT=true DEFAULTOPTION=VAULT
    VAR POINT3     hinge[1]     DEFAULT=(0, 0, 1)
    VAR RGBA8      tint[1]      DEFAULT=(255, 128, 0, 255)
    VAR PLKEY      owner[1]
    VAR CREATABLE  payload[2]
    VAR STRING     names[]
    VAR $Lock      locks[]
}
"#;

fn load_registry() -> DescriptorRegistry {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("age.sdl"), AGE_SDL).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a descriptor").unwrap();

    let mut registry = DescriptorRegistry::new();
    let count = registry.load_dir(dir.path()).unwrap();
    assert_eq!(count, 3);
    registry.validate().unwrap();
    registry
}

#[test]
fn test_load_dir_versions() {
    let registry = load_registry();
    assert_eq!(registry.len(), 3);

    let door = registry.latest("Door").unwrap();
    assert_eq!(door.version, 2);
    assert_eq!(door.num_vars(), 7);
    assert_eq!(registry.get("Door", 1).unwrap().num_vars(), 1);

    let (_, owner) = door.find_var("owner").unwrap();
    assert_eq!(owner.var_type, VarType::Key);
}

#[test]
fn test_fresh_record_defaults() {
    let registry = load_registry();
    let door = Record::new(registry.latest("Door").unwrap(), &registry).unwrap();

    assert_eq!(door.find_var("open").unwrap().value(0).unwrap().as_bool(), Some(true));
    assert_eq!(
        door.find_var("hinge").unwrap().value(0).unwrap().as_vector(),
        Some(&Vector3::new(0.0, 0.0, 1.0))
    );
    assert!(matches!(
        door.find_var("tint").unwrap().value(0),
        Some(SdlValue::Rgba8(c)) if *c == Color32::new(255, 128, 0, 255)
    ));
    assert_eq!(door.find_var("payload").unwrap().count(), 2);
    assert_eq!(door.find_var("locks").unwrap().count(), 0);
}

#[test]
fn test_edited_record_survives_blob_round_trip() {
    let registry = load_registry();
    let factory = CreatableFactory::with_builtins();
    let lock_desc = registry.latest("Lock").unwrap();

    let mut door = Record::new(registry.latest("Door").unwrap(), &registry).unwrap();
    *door.var_mut(3).unwrap().value_mut(0).unwrap() =
        SdlValue::Key(Uoid::new(Location::new(0x21, 4), 0x0001, "FrontDoor", 17));
    *door.var_mut(4).unwrap().value_mut(1).unwrap() = SdlValue::Creatable(Some(Box::new(
        GenericValue::new(GenericType::String("hello".into())),
    )));
    door.var_mut(5)
        .unwrap()
        .push_value(SdlValue::String("north".into()))
        .unwrap();

    let blob = door.write_blob().unwrap();
    let read = Record::read_blob(&blob, ReadContext::new(&registry, &factory)).unwrap();

    assert_eq!(read.name(), "Door");
    assert_eq!(read.version(), 2);
    assert_eq!(read.var(3).unwrap().value(0).unwrap().as_key().unwrap().name, "FrontDoor");
    assert!(read.var(4).unwrap().value(0).unwrap().as_creatable().is_none());
    assert_eq!(
        read.var(4).unwrap().value(1).unwrap().as_creatable().unwrap().class_index(),
        GenericValue::CLASS_INDEX
    );
    assert_eq!(read.var(5).unwrap().value(0).unwrap().as_str(), Some("north"));
    assert_eq!(read.write_blob().unwrap(), blob);

    // A standalone Lock decodes against its own header
    let lock = Record::new(lock_desc, &registry).unwrap();
    let lock_blob = lock.write_blob().unwrap();
    let lock_read = Record::read_blob(&lock_blob, ReadContext::new(&registry, &factory)).unwrap();
    assert_eq!(lock_read.var(1).unwrap().value(0).unwrap().as_char(), Some(b'A'));
}

#[test]
fn test_unknown_creatable_class_fails() {
    let registry = load_registry();
    let door = Record::new(registry.latest("Door").unwrap(), &registry).unwrap();
    let mut door = door;
    *door.var_mut(4).unwrap().value_mut(0).unwrap() =
        SdlValue::Creatable(Some(Box::new(GenericValue::new(GenericType::Int(3)))));
    let blob = door.write_blob().unwrap();

    let empty = CreatableFactory::new();
    let result = Record::read_blob(&blob, ReadContext::new(&registry, &empty));
    assert!(matches!(result, Err(SdlError::UnknownCreatable(GenericValue::CLASS_INDEX))));
}

#[test]
fn test_descriptor_serializes_to_json() {
    let registry = load_registry();
    let door = registry.latest("Door").unwrap();
    let json = serde_json::to_value(door.as_ref()).unwrap();

    assert_eq!(json["name"], "Door");
    assert_eq!(json["version"], 2);
    assert_eq!(json["vars"][0]["default_option"], "VAULT");
    assert_eq!(json["vars"][6]["state_desc"], "Lock");

    let back: StateDescriptor = serde_json::from_value(json).unwrap();
    assert_eq!(&back, door.as_ref());
}

#[test]
fn test_missing_nested_descriptor() {
    let mut registry = DescriptorRegistry::new();
    registry
        .load_source("STATEDESC Gate { VERSION 1 VAR $Hinge hinges[2] }")
        .unwrap();
    assert!(registry.validate().is_err());
    assert!(matches!(
        Record::new(registry.latest("Gate").unwrap(), &registry),
        Err(SdlError::UnknownDescriptorName(name)) if name == "Hinge"
    ));
}
