use bookstore_macros::value_object;

#[value_object]
struct Shelf {
    code: String,
}

#[value_object(debug = false)]
struct Cents(i64);

#[value_object]
enum Binding {
    #[default]
    Paperback,
    Hardcover,
}

fn main() {
    // Debug 默认开启
    let _ = format!("{:?}", Shelf { code: "A1".into() });

    let a = Shelf::default();
    let _b = a.clone();
    let _eq = a == Shelf { code: String::new() };

    // debug = false 时只做构造
    let _ = Cents(1250);

    let _binding: Binding = Default::default();
}
