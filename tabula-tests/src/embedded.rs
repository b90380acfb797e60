use tabula::{Engine, Entity, Executor};
use time::{Date, Month};

#[derive(Entity, Debug, PartialEq, Clone)]
pub struct Address {
    pub street: String,
    pub city: String,
    #[tabula("nullable:false")]
    pub postal_code: Option<String>,
}

pub async fn embedded<E: Executor>(engine: &mut Engine<E>) {
    #[derive(Entity, Debug, PartialEq)]
    struct Customer {
        #[tabula("primary_key:inc")]
        id: i64,
        name: String,
        billing: Address,
        since: Date,
    }

    let table = Customer::table_ref();
    let columns: Vec<_> = table.fields.iter().map(|f| f.storage_name).collect();
    assert_eq!(
        columns,
        ["id", "name", "street", "city", "postal_code", "since"]
    );

    // Setup
    engine
        .destructive_reset_tables(&[table])
        .await
        .expect("Failed to reset customer");

    let address = Address {
        street: "Via Roma 1".into(),
        city: "Torino".into(),
        postal_code: Some("10121".into()),
    };
    let mut customer = Customer {
        id: 0,
        name: "Ada".into(),
        billing: address.clone(),
        since: Date::from_calendar_date(2024, Month::February, 29).expect("Invalid date"),
    };
    engine
        .create(&mut customer)
        .await
        .expect("Failed to create the customer");
    assert_eq!(customer.id, 1);
    assert_eq!(customer.billing, address);
    assert_eq!(
        customer.since,
        Date::from_calendar_date(2024, Month::February, 29).expect("Invalid date")
    );

    customer.billing.city = "Milano".into();
    customer.billing.postal_code = None;
    engine
        .update(&mut customer)
        .await
        .expect("Failed to update the customer");
    assert_eq!(customer.billing.city, "Milano");
    assert_eq!(customer.billing.postal_code.as_deref(), Some(""));
}
