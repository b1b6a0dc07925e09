use bookstore_macros::canonical_enum;

#[canonical_enum]
enum Binding {
    Paperback,
    #[label = "Hard cover"]
    Hardcover,
}

fn main() {
    assert_eq!(Binding::ALL.len(), 2);
    assert_eq!(Binding::Hardcover.label(), "Hard cover");
    assert_eq!(Binding::Paperback.to_string(), "Paperback");
    assert_eq!(Binding::from_label("Hard cover"), Some(Binding::Hardcover));
    assert_eq!(Binding::from_label("hard cover"), None);

    let json = serde_json::to_string(&Binding::Hardcover).unwrap();
    assert_eq!(json, "\"Hard cover\"");
    let back: Binding = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Binding::Hardcover);
}
