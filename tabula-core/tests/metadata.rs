#[cfg(test)]
mod tests {
    use tabula_core::{
        EngineConfig, ForeignKeySpec, parse_annotation, parse_foreign_key_target, storage_name,
        validate_attributes,
    };

    #[test]
    fn storage_names() {
        assert_eq!(storage_name("depotNum"), "depot_num");
        assert_eq!(storage_name("DepotNum"), "depot_num");
        assert_eq!(storage_name("HTTPRequest"), "http_request");
        assert_eq!(storage_name("sensor2Reading"), "sensor2_reading");
        assert_eq!(storage_name("already_snake"), "already_snake");
        assert_eq!(storage_name("X"), "x");
    }

    #[test]
    fn annotations() {
        let annotation = parse_annotation("primary_key:inc; start:90000000");
        assert!(annotation.persisted);
        assert_eq!(
            annotation.attributes,
            [
                ("primary_key".to_string(), "inc".to_string()),
                ("start".to_string(), "90000000".to_string()),
            ]
        );

        let annotation = parse_annotation("default:12:30:00");
        assert_eq!(annotation.attributes[0].1, "12:30:00");

        let annotation = parse_annotation("primary_key;;");
        assert_eq!(
            annotation.attributes,
            [("primary_key".to_string(), String::new())]
        );

        let annotation = parse_annotation("-");
        assert!(!annotation.persisted);
        assert!(annotation.attributes.is_empty());
    }

    #[test]
    fn attribute_validation() {
        assert!(validate_attributes([("primary_key", "inc"), ("start", "-5")]).is_ok());
        assert!(validate_attributes([("index", "idx_composite"), ("fkey", "depot(depot_num)")]).is_ok());
        assert!(validate_attributes([("primary_key", "auto")]).is_err());
        assert!(validate_attributes([("start", "soon")]).is_err());
        assert!(validate_attributes([("nullable", "maybe")]).is_err());
        assert!(validate_attributes([("constraint", "check")]).is_err());
        assert!(validate_attributes([("fkey", "depot")]).is_err());
        let error = validate_attributes([("colour", "red")]).unwrap_err();
        assert!(error.to_string().contains("colour"));
    }

    #[test]
    fn foreign_keys() {
        assert_eq!(
            parse_foreign_key_target("depot ( depot_num )"),
            Some(("depot", "depot_num"))
        );
        assert_eq!(parse_foreign_key_target("depot()"), None);
        assert_eq!(parse_foreign_key_target("(id)"), None);
        let spec = ForeignKeySpec::new("parcel", "depot", "depot", "depot_num");
        assert_eq!(spec.name(), "fk_parcel_depot_depot_num");
    }

    #[test]
    fn config() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "log_statements": true }"#).unwrap();
        assert_eq!(
            config,
            EngineConfig {
                log_statements: true,
                string_length: 255,
            }
        );
        let config: EngineConfig = serde_json::from_str(r#"{ "string_length": 80 }"#).unwrap();
        assert_eq!(config.string_length, 80);
        assert!(serde_json::from_str::<EngineConfig>(r#"{ "pool_size": 4 }"#).is_err());
    }
}
