use bookstore_domain::entity::Entity;
use bookstore_macros::entity;

#[entity(id = u64)]
#[derive(PartialEq)]
struct Shelf {
    label: String,
}

#[entity]
struct Note {
    text: String,
}

fn main() {
    let shelf = Shelf {
        id: 3,
        label: "Fiction A-F".to_string(),
    };
    assert_eq!(*shelf.id(), 3);
    assert_eq!(shelf.clone(), shelf);
    let _ = format!("{:?}", shelf);

    let note = Note {
        id: "n-1".to_string(),
        text: "restock".to_string(),
    };
    assert_eq!(note.id(), "n-1");
    let _ = serde_json::to_string(&note).unwrap();
}
