use tabula::{Engine, Entity, Executor, ZERO_TIMESTAMP};
use time::PrimitiveDateTime;

pub async fn defaults<E: Executor>(engine: &mut Engine<E>) {
    #[derive(Entity, Debug)]
    struct Setting {
        #[tabula("primary_key")]
        key: String,
        #[tabula("default:42")]
        answer: i32,
        #[tabula("default:'on'")]
        mode: String,
        #[tabula("default:true")]
        enabled: bool,
        #[tabula("default:now()")]
        created: PrimitiveDateTime,
    }

    // Setup
    engine
        .destructive_reset_tables(&[Setting::table_ref()])
        .await
        .expect("Failed to reset setting");

    // Zero values are replaced by the declared defaults
    let mut setting = Setting {
        key: "first".into(),
        answer: 0,
        mode: String::new(),
        enabled: false,
        created: ZERO_TIMESTAMP,
    };
    engine
        .create(&mut setting)
        .await
        .expect("Failed to create the first setting");
    assert_eq!(setting.key, "first");
    assert_eq!(setting.answer, 42);
    assert_eq!(setting.mode, "on");
    assert!(setting.enabled);
    assert_ne!(setting.created, ZERO_TIMESTAMP);

    // Non zero values are kept
    let mut setting = Setting {
        key: "second".into(),
        answer: 7,
        mode: "off".into(),
        enabled: true,
        created: ZERO_TIMESTAMP,
    };
    engine
        .create(&mut setting)
        .await
        .expect("Failed to create the second setting");
    assert_eq!(setting.answer, 7);
    assert_eq!(setting.mode, "off");

    // Update writes the default expression for zero values too
    setting.answer = 0;
    setting.mode = "manual".into();
    engine
        .update(&mut setting)
        .await
        .expect("Failed to update the second setting");
    assert_eq!(setting.answer, 42);
    assert_eq!(setting.mode, "manual");
}
