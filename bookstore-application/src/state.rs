use std::cell::RefCell;
use std::rc::Rc;

use bookstore_domain::catalogue::Catalogue;
use bookstore_domain::factory::BookFactory;
use bookstore_domain::settings::CatalogueSettings;

/// 单会话状态：目录与为其分配 ID 的工厂
#[derive(Debug, Default)]
pub struct BookstoreState {
    pub catalogue: Catalogue,
    pub factory: BookFactory,
}

impl BookstoreState {
    pub fn new(settings: CatalogueSettings) -> Self {
        Self {
            catalogue: Catalogue::with_settings(settings),
            factory: BookFactory::new(),
        }
    }
}

/// 处理器之间共享的状态（单线程）
pub type SharedState = Rc<RefCell<BookstoreState>>;

pub fn shared(state: BookstoreState) -> SharedState {
    Rc::new(RefCell::new(state))
}
