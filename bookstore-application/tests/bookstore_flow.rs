use std::io::Write;

use bookstore_application::Bookstore;
use bookstore_application::commands::{AddBook, DeleteBook, UpdateStock};
use bookstore_application::context::AppContext;
use bookstore_application::error::AppError;
use bookstore_application::queries::{
    GenerateStockReport, ListBooks, ListCategories, SearchBooks, ShowBook,
};
use bookstore_domain::catalogue::AddOutcome;
use bookstore_domain::book::BookId;
use bookstore_domain::error::DomainError;
use bookstore_domain::factory::FieldMap;
use bookstore_domain::settings::{CatalogueSettings, StockPolicy};

const BOOKS: &str = "\
title,author,description,category,medium,audience,size,purchase_price,selling_price,stock
Kongens Fald,Johannes V. Jensen,Roman,Fiction,Printed,Adults,280,89.5,179.95,12
Kongens Fald,Johannes V. Jensen,Oplæst,Fiction,Audiobook,Adults,610,120,199,3
Danmarks Historie,Palle Lauring,Fakta,Non-fiction,E-book,Young adults,2048,45,99,30
KONGENS FALD,johannes v. jensen,Dublet,Fiction,Printed,Adults,280,89.5,179.95,1
Uden lager,Ukendt,x,Fiction,Printed,Adults,10,1,2,mange
";

fn imported() -> anyhow::Result<(Bookstore, AppContext)> {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    file.write_all(BOOKS.as_bytes())?;

    let store = Bookstore::new(CatalogueSettings::default())?;
    let ctx = AppContext::for_actor("test");
    let report = store.import_file(&ctx, file.path())?;

    assert_eq!(report.added, vec![1, 2, 3]);
    assert_eq!(report.duplicates, vec![4]);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].row, 5);
    Ok((store, ctx))
}

fn manual(title: &str) -> FieldMap {
    [
        ("title", title),
        ("author", "Karen Blixen"),
        ("description", "Fortællinger"),
        ("category", "fiction"),
        ("medium", "e-book"),
        ("audience", "adults"),
        ("size", "512"),
        ("purchase_price", "40"),
        ("selling_price", "80"),
        ("stock", "7"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[test]
fn import_then_query() -> anyhow::Result<()> {
    let (store, ctx) = imported()?;
    assert_eq!(store.len(), 3);

    let hits = store.ask(&ctx, SearchBooks::by("title", "kongens fald"))?;
    assert_eq!(hits.matches.len(), 2);

    let hits = store.ask(
        &ctx,
        SearchBooks::by("title", "kongens fald").and("medium", "audiobook"),
    )?;
    assert_eq!(hits.matches.len(), 1);
    assert!(hits.rendered.starts_with("Id: 2\n"));

    let hits = store.ask(
        &ctx,
        SearchBooks::by("author", "Johannes V. Jensen").except("medium", "printed"),
    )?;
    assert_eq!(hits.matches.len(), 1);
    assert!(hits.rendered.starts_with("Id: 2\n"));
    assert_eq!(hits.query_type, "author and not medium");

    let miss = store.ask(&ctx, SearchBooks::by("book_id", "-1"))?;
    assert!(miss.matches.is_empty());
    assert_eq!(
        miss.rendered,
        "No books matching the query type book_id and the query value -1 found in the catalogue."
    );

    let categories = store.ask(&ctx, ListCategories)?;
    assert_eq!(categories.to_string(), "1. Fiction\n2. Non-fiction");

    let listing = store.ask(&ctx, ListBooks)?;
    let ids: Vec<u64> = listing.books.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(listing.to_string().contains("Title: Danmarks Historie"));
    Ok(())
}

#[test]
fn manual_add_gets_next_id_and_can_be_shown() -> anyhow::Result<()> {
    let (store, ctx) = imported()?;

    let outcome = store.execute(&ctx, AddBook { fields: manual("Babettes Gæstebud") })?;
    // 导入时的重复行已占用 ID 4
    assert_eq!(outcome, AddOutcome::Added(BookId::new(5)));

    let detail = store.ask(&ctx, ShowBook { id: "5".into() })?;
    assert_eq!(detail.size_unit, "KB");
    assert_eq!(
        detail.lines[0],
        "The e-book 'Babettes Gæstebud' has a size of 512 KB."
    );
    assert_eq!(detail.selling_price, "80.00");
    Ok(())
}

#[test]
fn delete_and_stock_updates_report_domain_errors() -> anyhow::Result<()> {
    let (store, ctx) = imported()?;

    let message = store.execute(&ctx, DeleteBook { id: "3".into() })?;
    assert_eq!(
        message,
        "The book with the title 'Danmarks Historie' and the ID 3 was successfully removed."
    );

    let err = store
        .execute(&ctx, DeleteBook { id: "3".into() })
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::NotFound { .. })));

    let stock = store.execute(&ctx, UpdateStock { id: "2".into(), delta: -3 })?;
    assert_eq!(stock, 0);
    let err = store
        .execute(&ctx, UpdateStock { id: "2".into(), delta: -1 })
        .unwrap_err();
    assert!(matches!(
        err.as_domain(),
        Some(DomainError::InsufficientStock { .. })
    ));

    let err = store.ask(&ctx, ShowBook { id: "3".into() }).unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::NotFound { .. })));

    let err = store
        .execute(&ctx, DeleteBook { id: "-1".into() })
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::NotFound { .. })));
    let err = store.ask(&ctx, ShowBook { id: "seven".into() }).unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::InvalidId { .. })));
    Ok(())
}

#[test]
fn stock_report_reorders_the_catalogue() -> anyhow::Result<()> {
    let (store, ctx) = imported()?;

    let report = store.ask(
        &ctx,
        GenerateStockReport {
            sort_key: "ascending_stock".into(),
        },
    )?;
    assert_eq!(report.sort_key.as_deref(), Some("ascending_stock"));
    assert!(report.entries[0].starts_with("Id: 2\n"));

    // 后续检索看到的是重排后的顺序
    let all_fiction = store.ask(&ctx, SearchBooks::by("category", "fiction"))?;
    assert!(all_fiction.matches[0].starts_with("Id: 2\n"));

    let unchanged = store.ask(
        &ctx,
        GenerateStockReport {
            sort_key: "price".into(),
        },
    )?;
    assert_eq!(unchanged.sort_key, None);
    assert_eq!(unchanged.entries, report.entries);
    Ok(())
}

#[test]
fn negative_stock_can_be_allowed() -> anyhow::Result<()> {
    let settings = CatalogueSettings::builder()
        .stock_policy(StockPolicy::AllowNegative)
        .build();
    let store = Bookstore::new(settings)?;
    let ctx = AppContext::default();
    store.execute(&ctx, AddBook { fields: manual("Skygger på græsset") })?;

    let stock = store.execute(&ctx, UpdateStock { id: "1".into(), delta: -10 })?;
    assert_eq!(stock, -3);
    Ok(())
}

#[test]
fn empty_search_is_a_validation_error() -> anyhow::Result<()> {
    let store = Bookstore::new(CatalogueSettings::default())?;
    let err = store
        .ask(&AppContext::default(), SearchBooks::default())
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(store.registered_commands().len(), 4);
    assert_eq!(store.registered_queries().len(), 5);
    Ok(())
}
