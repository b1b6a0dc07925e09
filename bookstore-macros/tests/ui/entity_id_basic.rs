use bookstore_macros::entity_id;

#[entity_id(copy = true)]
struct ShelfId(u64);

#[entity_id]
struct Isbn(String);

fn main() {
    let id = ShelfId::new(7);
    let copied = id;
    assert_eq!(id, copied);
    assert!(ShelfId::new(1) < ShelfId::new(2));
    assert_eq!(id.to_string(), "7");
    assert_eq!("12".parse::<ShelfId>().unwrap(), ShelfId::from(12));
    assert!("x".parse::<ShelfId>().is_err());
    let raw: u64 = id.into();
    assert_eq!(raw, 7);

    let isbn = Isbn::new("978-3-16".to_string());
    let _ = format!("{:?}", isbn.clone());
    assert_eq!(isbn.value(), "978-3-16");
}
