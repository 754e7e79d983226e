use mission_board::AppError;

#[test]
fn display_prefixes_identify_the_failure_kind() {
    let cases = [
        (AppError::Config("bad".into()), "config: bad"),
        (AppError::Db("locked".into()), "db: locked"),
        (AppError::Validation("no area".into()), "validation: no area"),
        (AppError::NotFound("mission 4".into()), "not found: mission 4"),
        (
            AppError::DataIntegrity("no creator".into()),
            "data integrity: no creator",
        ),
        (AppError::Io("denied".into()), "io: denied"),
    ];
    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn toml_errors_convert_to_config() {
    let err = toml::from_str::<toml::Value>("= 1").expect_err("invalid toml");
    assert!(matches!(AppError::from(err), AppError::Config(_)));
}

#[test]
fn json_errors_convert_to_db() {
    let err = serde_json::from_str::<Vec<String>>("{").expect_err("invalid json");
    assert!(matches!(AppError::from(err), AppError::Db(_)));
}

#[test]
fn io_errors_convert_to_io() {
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let converted = AppError::from(err);
    assert!(matches!(converted, AppError::Io(_)));
    assert_eq!(converted.to_string(), "io: gone");
}
