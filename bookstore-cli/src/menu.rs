//! 交互式菜单
//!
//! 菜单对输入/输出泛型化，便于以脚本化输入测试。
//! 输入结束（EOF）等同于选择退出。
//!
use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use bookstore_application::Bookstore;
use bookstore_application::commands::{AddBook, DeleteBook, UpdateStock};
use bookstore_application::context::AppContext;
use bookstore_application::queries::{
    GenerateStockReport, ListBooks, ListCategories, SearchBooks, ShowBook,
};
use bookstore_domain::catalogue::AddOutcome;
use bookstore_domain::error::DomainError;
use bookstore_domain::factory::FieldMap;
use tracing::debug;

const SEARCH_OPTIONS: [(&str, &str); 5] = [
    ("1", "book_id"),
    ("2", "title"),
    ("3", "author"),
    ("4", "category"),
    ("5", "medium"),
];

const SORT_OPTIONS: [(&str, &str); 6] = [
    ("1", "alphabetical_author"),
    ("2", "alphabetical_title"),
    ("3", "category"),
    ("4", "medium"),
    ("5", "ascending_stock"),
    ("6", "descending_stock"),
];

/// 手工录入时依次询问的字段及提示语
const MANUAL_PROMPTS: [(&str, &str); 10] = [
    ("title", "Enter the book's title:"),
    ("author", "Enter the author(s):"),
    ("description", "Enter a description of the book:"),
    ("category", "Select a category (Fiction or Non-fiction):"),
    ("medium", "Select a medium (Printed, Audiobook, or E-book):"),
    (
        "audience",
        "Select a target audience (Children, Young adults, or Adults):",
    ),
    (
        "size",
        "Enter the size, i.e. number of pages (printed books), length in minutes (audiobooks) or size in KB (e-books):",
    ),
    ("purchase_price", "Enter the purchase price:"),
    ("selling_price", "Enter the selling price:"),
    (
        "stock",
        "Enter the current stock, i.e. how many copies you're adding:",
    ),
];

fn lookup(options: &[(&'static str, &'static str)], choice: &str) -> Option<&'static str> {
    options
        .iter()
        .find(|(key, _)| *key == choice)
        .map(|(_, value)| *value)
}

pub struct Menu<'a, R, W> {
    store: &'a Bookstore,
    ctx: AppContext,
    data_file: PathBuf,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a Bookstore, data_file: PathBuf, input: R, output: W) -> Self {
        Self {
            store,
            ctx: AppContext::for_actor("menu"),
            data_file,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// 打印提示并读取一行（去除首尾空白）；EOF 时返回 `None`
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        if text.ends_with(':') {
            writeln!(self.output, "{text}")?;
        } else {
            write!(self.output, "{text}")?;
        }
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, text: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            self.display_menu()?;
            let Some(choice) = self.prompt("Enter your choice (1-7): ")? else {
                self.say("\nExiting the program. Goodbye!")?;
                return Ok(());
            };
            self.say("")?;
            debug!(%choice, "main menu selection");

            match choice.as_str() {
                "1" => self.add_new_book()?,
                "2" => self.search_catalogue()?,
                "3" => self.delete_book()?,
                "4" => self.get_reports()?,
                "5" => {
                    self.say("Exiting the program. Goodbye!")?;
                    return Ok(());
                }
                "6" => self.adjust_stock()?,
                "7" => self.list_categories()?,
                _ => self.say("Invalid choice. Please select a number from 1 to 7.")?,
            }
            self.say("")?;
        }
    }

    fn display_menu(&mut self) -> Result<()> {
        self.say(
            "Welcome to the bookstore management system!\n\
             1. Add a new book.\n\
             2. Search for a book.\n\
             3. Delete a book.\n\
             4. Get reports on the bookstore's stock.\n\
             5. Exit.\n\
             6. Adjust the stock of a book.\n\
             7. List the categories in the catalogue.\n",
        )
    }

    fn add_new_book(&mut self) -> Result<()> {
        loop {
            self.say(
                "Add new books to the book catalogue.\n\
                 Options:\n\
                 1. Add books from a data file.\n\
                 2. Enter new data.\n\
                 3. Exit and return to the main menu.",
            )?;
            let Some(choice) = self.prompt("Enter your choice (1-3): ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => {
                    if !self.add_from_data_file()? {
                        return Ok(());
                    }
                }
                "2" => {
                    if !self.add_manually()? {
                        return Ok(());
                    }
                }
                "3" => {
                    self.say("Returning to menu.")?;
                    return Ok(());
                }
                _ => self.say("Invalid selection. Please try again.")?,
            }
        }
    }

    /// 返回 `true` 表示留在“添加”子菜单
    fn add_from_data_file(&mut self) -> Result<bool> {
        let report = match self.store.import_file(&self.ctx, &self.data_file) {
            Ok(report) => report,
            Err(err) => {
                self.say(format!("{err}\nReturning to main menu."))?;
                return Ok(false);
            }
        };
        self.say(&report)?;

        let Some(choice) = self.prompt(
            "Enter p to print the books or e to exit and return to the main menu: ",
        )?
        else {
            return Ok(false);
        };
        match choice.to_lowercase().as_str() {
            "p" => {
                let listing = self.store.ask(&self.ctx, ListBooks)?;
                self.say(format!("\n{listing}\n"))?;
                Ok(true)
            }
            "e" => Ok(false),
            other => {
                self.say(format!(
                    "Invalid selection: {other}. Returning to main menu."
                ))?;
                Ok(false)
            }
        }
    }

    /// 返回 `true` 表示留在“添加”子菜单
    fn add_manually(&mut self) -> Result<bool> {
        self.say("\nEnter new data to add a book to the catalogue.\n")?;
        let mut fields = FieldMap::new();
        for (field, text) in MANUAL_PROMPTS {
            let Some(value) = self.prompt(text)? else {
                return Ok(false);
            };
            fields.insert(field.to_string(), value);
        }
        self.say("")?;

        let title = fields.get("title").cloned().unwrap_or_default();
        let author = fields.get("author").cloned().unwrap_or_default();
        let medium = fields.get("medium").cloned().unwrap_or_default();

        let id = match self.store.execute(&self.ctx, AddBook { fields }) {
            Ok(AddOutcome::Added(id)) => id,
            Ok(AddOutcome::Duplicate { .. }) => {
                let notice = DomainError::DuplicateRecord {
                    title,
                    author,
                    medium,
                };
                self.say(format!("{notice}\nReturning to main menu."))?;
                return Ok(false);
            }
            Err(err) => {
                self.say(format!("{err}\nReturning to main menu."))?;
                return Ok(false);
            }
        };

        self.say("Book added successfully!")?;
        let Some(choice) = self.prompt(
            "Enter p to print the book or e to exit and return to the main menu: ",
        )?
        else {
            return Ok(false);
        };
        match choice.to_lowercase().as_str() {
            "p" => {
                let detail = self.store.ask(&self.ctx, ShowBook { id: id.to_string() })?;
                self.say(format!("\n{detail}\n"))?;
                Ok(true)
            }
            "e" => {
                self.say("Returning to main menu.\n")?;
                Ok(false)
            }
            other => {
                self.say(format!(
                    "Invalid selection: {other}. Returning to main menu."
                ))?;
                Ok(false)
            }
        }
    }

    fn search_catalogue(&mut self) -> Result<()> {
        loop {
            self.say(
                "Search in the bookstore catalogue.\n\
                 Options:\n\
                 1. Search by book ID.\n\
                 2. Search by book title.\n\
                 3. Search by author.\n\
                 4. Search by category (fiction or non-fiction).\n\
                 5. Search by medium (printed, audiobook, or e-book).\n\
                 6. Search by several criteria, with optional exclusions.\n\
                 7. Exit and return to the main menu.\n",
            )?;
            let Some(choice) = self.prompt("Enter your choice (1-7): ")? else {
                return Ok(());
            };
            self.say("")?;

            let query = match choice.as_str() {
                "6" => match self.read_criteria()? {
                    Some(query) => query,
                    None => return Ok(()),
                },
                "7" => {
                    self.say("Returning to main menu.\n")?;
                    return Ok(());
                }
                other => {
                    let Some(query_type) = lookup(&SEARCH_OPTIONS, other) else {
                        self.say("Invalid choice. Please enter a number from 1 to 7.\n")?;
                        continue;
                    };
                    let Some(value) = self.prompt(&format!(
                        "Enter the {query_type} that you want to search for:"
                    ))?
                    else {
                        return Ok(());
                    };
                    SearchBooks::by(query_type, value)
                }
            };
            self.say("")?;

            match self.store.ask(&self.ctx, query) {
                Ok(result) => self.say(format!("Search result:\n{result}\n"))?,
                Err(err) => self.say(format!("{err}\n"))?,
            }
        }
    }

    /// 先逐条读取包含条件，再逐条读取排除条件；空的检索类型结束当前一轮。EOF 时返回 `None`
    fn read_criteria(&mut self) -> Result<Option<SearchBooks>> {
        let Some(criteria) = self.read_pairs(
            "Enter a query type (book_id, title, author, category, medium), or leave empty to continue:",
            "search for",
        )?
        else {
            return Ok(None);
        };
        let Some(exclusions) = self.read_pairs(
            "Enter a query type to exclude, or leave empty to search:",
            "exclude",
        )?
        else {
            return Ok(None);
        };
        Ok(Some(SearchBooks {
            criteria,
            exclusions,
        }))
    }

    fn read_pairs(
        &mut self,
        type_prompt: &str,
        verb: &str,
    ) -> Result<Option<Vec<(String, String)>>> {
        let mut pairs = Vec::new();
        loop {
            let Some(query_type) = self.prompt(type_prompt)? else {
                return Ok(None);
            };
            if query_type.is_empty() {
                return Ok(Some(pairs));
            }
            let Some(value) =
                self.prompt(&format!("Enter the {query_type} that you want to {verb}:"))?
            else {
                return Ok(None);
            };
            pairs.push((query_type, value));
        }
    }

    fn delete_book(&mut self) -> Result<()> {
        self.say("Delete a book from the catalogue.")?;
        let Some(id) = self.prompt("Enter the ID of the book you want to delete: ")? else {
            return Ok(());
        };
        self.say("")?;

        match self.store.execute(&self.ctx, DeleteBook { id }) {
            Ok(message) => self.say(message),
            Err(err) => self.say(err),
        }
    }

    fn get_reports(&mut self) -> Result<()> {
        loop {
            self.say(
                "Generate reports on the bookstore's stock.\n\n\
                 Choose how you want the stock items sorted:\n\
                 1. Alphabetically by author's last name.\n\
                 2. Alphabetically by title.\n\
                 3. Grouped by category.\n\
                 4. Grouped by medium.\n\
                 5. Stock, ascending order.\n\
                 6. Stock, descending order.\n\
                 7. Exit and return to main menu.\n",
            )?;
            let Some(choice) = self.prompt("Enter your choice (1-7): ")? else {
                return Ok(());
            };
            self.say("")?;

            if choice == "7" {
                self.say("Returning to main menu.")?;
                return Ok(());
            }
            let Some(sort_key) = lookup(&SORT_OPTIONS, &choice) else {
                self.say("Invalid choice. Please enter a number from 1 to 7.\n")?;
                continue;
            };

            let report = self.store.ask(
                &self.ctx,
                GenerateStockReport {
                    sort_key: sort_key.to_string(),
                },
            )?;
            self.say(format!("{report}\n"))?;
        }
    }

    fn adjust_stock(&mut self) -> Result<()> {
        self.say("Adjust the stock of a book.")?;
        let Some(id) = self.prompt("Enter the ID of the book: ")? else {
            return Ok(());
        };
        let Some(raw_delta) =
            self.prompt("Enter the change in stock (e.g. 5 or -2): ")?
        else {
            return Ok(());
        };
        self.say("")?;

        let delta: i64 = match raw_delta.parse() {
            Ok(delta) => delta,
            Err(_) => {
                return self.say(format!(
                    "Invalid stock change '{raw_delta}'. Please enter a whole number."
                ));
            }
        };

        match self.store.execute(&self.ctx, UpdateStock { id: id.clone(), delta }) {
            Ok(stock) => self.say(format!(
                "Current stock for the book with the ID {}: {stock}",
                id.trim()
            )),
            Err(err) => self.say(err),
        }
    }

    fn list_categories(&mut self) -> Result<()> {
        let categories = self.store.ask(&self.ctx, ListCategories)?;
        self.say(format!("Categories in the catalogue:\n{categories}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_domain::settings::CatalogueSettings;
    use std::io::{Cursor, Write as _};

    const DATA: &str = "\
title,author,description,category,medium,audience,size,purchase_price,selling_price,stock
Kongens Fald,Johannes V. Jensen,Roman,Fiction,Printed,Adults,280,89.5,179.95,12
Danmarks Historie,Palle Lauring,Fakta,Non-fiction,E-book,Young adults,2048,45,99,30
";

    fn run_script(store: &Bookstore, data_file: PathBuf, script: &str) -> String {
        let mut menu = Menu::new(store, data_file, Cursor::new(script.to_string()), Vec::new());
        menu.run().unwrap();
        String::from_utf8(menu.into_output()).unwrap()
    }

    fn store() -> Bookstore {
        Bookstore::new(CatalogueSettings::default()).unwrap()
    }

    fn data_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(DATA.as_bytes()).unwrap();
        file
    }

    #[test]
    fn exit_and_invalid_choices() {
        let store = store();
        let out = run_script(&store, PathBuf::from("unused.csv"), "9\n5\n");
        assert!(out.contains("Invalid choice. Please select a number from 1 to 7."));
        assert!(out.ends_with("Exiting the program. Goodbye!\n"));
    }

    #[test]
    fn eof_exits_cleanly() {
        let store = store();
        let out = run_script(&store, PathBuf::from("unused.csv"), "2\n");
        assert!(out.contains("Exiting the program. Goodbye!"));
    }

    #[test]
    fn import_from_data_file_and_print() {
        let store = store();
        let file = data_file();
        let script = concat!(
            "1\n2\nSkyggernes Bog\nIb Michael\nRoman\nfiction\naudiobook\nadults\n540\n100\n199.5\n4\ne\n",
            "1\n1\np\n3\n5\n"
        );
        let out = run_script(&store, file.path().to_path_buf(), script);
        let printed = &out[out.find("Imported 2 book(s) from 2 row(s)").unwrap()..];
        // 打印的是整个目录，包括导入前手工录入的书
        assert!(printed.contains("Title: Skyggernes Bog"));
        assert!(printed.contains("Title: Kongens Fald"));
        assert!(printed.contains("Title: Danmarks Historie"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn manual_entry_then_print() {
        let store = store();
        let script = "1\n2\nSkyggernes Bog\nIb Michael\nRoman\nfiction\naudiobook\nadults\n540\n100\n199.5\n4\np\n3\n5\n";
        let out = run_script(&store, PathBuf::from("unused.csv"), script);
        assert!(out.contains("Book added successfully!"));
        assert!(out.contains("The audiobook 'Skyggernes Bog' has a length of 540 minutes."));
        assert!(out.contains("Selling price for the book Skyggernes Bog: 199.50."));
    }

    #[test]
    fn manual_entry_reports_validation_errors() {
        let store = store();
        let script = "1\n2\nX\nY\nZ\nfiction\nvinyl\nadults\n10\n1\n2\n3\n5\n";
        let out = run_script(&store, PathBuf::from("unused.csv"), script);
        assert!(out.contains("Invalid medium value 'vinyl'."));
        assert!(out.contains("Returning to main menu."));
        assert!(store.is_empty());
    }

    #[test]
    fn search_delete_and_reports() {
        let store = store();
        let file = data_file();
        let script = concat!(
            "1\n1\ne\n",
            "2\n3\npalle lauring\n8\n7\n",
            "4\n5\n7\n",
            "3\n1\n",
            "3\nabc\n",
            "5\n"
        );
        let out = run_script(&store, file.path().to_path_buf(), script);
        assert!(out.contains("Search result:\nId: 2\n"));
        assert!(out.contains("Invalid choice. Please enter a number from 1 to 7."));
        assert!(out.contains(
            "The book with the title 'Kongens Fald' and the ID 1 was successfully removed."
        ));
        assert!(out.contains("Invalid book ID 'abc'."));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn compound_search_stock_and_categories() {
        let store = store();
        let file = data_file();
        let script = concat!(
            "1\n1\ne\n",
            "2\n6\nmedium\ne-book\ncategory\nnon-fiction\n\n\n7\n",
            "6\n2\n-31\n",
            "6\n2\n-30\n",
            "7\n",
            "5\n"
        );
        let out = run_script(&store, file.path().to_path_buf(), script);
        assert!(out.contains("Title: Danmarks Historie"));
        assert!(out.contains("Insufficient stock for book 2"));
        assert!(out.contains("Current stock for the book with the ID 2: 0"));
        assert!(out.contains("Categories in the catalogue:\n1. Fiction\n2. Non-fiction"));
    }

    #[test]
    fn compound_search_with_exclusion() {
        let store = store();
        let file = data_file();
        let script = concat!(
            "1\n1\ne\n",
            "2\n6\ncategory\nfiction\n\nmedium\nprinted\n\n7\n",
            "5\n"
        );
        let out = run_script(&store, file.path().to_path_buf(), script);
        assert!(out.contains(
            "No books matching the query type category and not medium and the query value fiction and not printed found in the catalogue."
        ));
    }
}
