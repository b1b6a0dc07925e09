//! 写操作：录入、导入、删除与库存调整
//!
use bookstore_domain::book::BookId;
use bookstore_domain::catalogue::AddOutcome;
use bookstore_domain::factory::FieldMap;
use tracing::{info, warn};

use crate::command::Command;
use crate::command_handler::CommandHandler;
use crate::context::AppContext;
use crate::dto::{ImportReport, RowFailure};
use crate::error::AppError;
use crate::import::ImportRow;
use crate::state::SharedState;

/// 手工录入一本书（完整校验）
#[derive(Debug, Clone)]
pub struct AddBook {
    pub fields: FieldMap,
}

impl Command for AddBook {
    const NAME: &'static str = "book.add";
    type Output = AddOutcome;
}

/// 批量导入（逐行强制转换，失败行跳过）
#[derive(Debug, Clone)]
pub struct ImportBooks {
    pub rows: Vec<ImportRow>,
}

impl Command for ImportBooks {
    const NAME: &'static str = "book.import";
    type Output = ImportReport;
}

/// 按文本 ID 删除
#[derive(Debug, Clone)]
pub struct DeleteBook {
    pub id: String,
}

impl Command for DeleteBook {
    const NAME: &'static str = "book.delete";
    type Output = String;
}

/// 调整库存
#[derive(Debug, Clone)]
pub struct UpdateStock {
    pub id: String,
    pub delta: i64,
}

impl Command for UpdateStock {
    const NAME: &'static str = "book.update_stock";
    type Output = i64;
}

pub struct AddBookHandler {
    state: SharedState,
}

impl AddBookHandler {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl CommandHandler<AddBook> for AddBookHandler {
    fn handle(&self, ctx: &AppContext, cmd: AddBook) -> Result<AddOutcome, AppError> {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let outcome = state
            .factory
            .handle_new_book_input(&mut state.catalogue, &cmd.fields)?;
        info!(actor = ctx.actor_name(), ?outcome, "add book handled");
        Ok(outcome)
    }
}

pub struct ImportBooksHandler {
    state: SharedState,
}

impl ImportBooksHandler {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl CommandHandler<ImportBooks> for ImportBooksHandler {
    fn handle(&self, ctx: &AppContext, cmd: ImportBooks) -> Result<ImportReport, AppError> {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let mut report = ImportReport::default();

        for (i, row) in cmd.rows.iter().enumerate() {
            let row_no = i + 1;
            let result = match row {
                ImportRow::Fields(fields) => state
                    .factory
                    .from_row(&mut state.catalogue, fields)
                    .map_err(|e| e.to_string()),
                ImportRow::Malformed { reason } => Err(reason.clone()),
            };

            match result {
                Ok(AddOutcome::Added(id)) => report.added.push(*id.value()),
                Ok(AddOutcome::Duplicate { rejected, .. }) => {
                    report.duplicates.push(*rejected.value())
                }
                Err(reason) => {
                    warn!(row = row_no, %reason, "import row rejected");
                    report.rejected.push(RowFailure {
                        row: row_no,
                        reason,
                    });
                }
            }
        }

        info!(
            actor = ctx.actor_name(),
            added = report.added.len(),
            duplicates = report.duplicates.len(),
            rejected = report.rejected.len(),
            "import finished"
        );
        Ok(report)
    }
}

pub struct DeleteBookHandler {
    state: SharedState,
}

impl DeleteBookHandler {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl CommandHandler<DeleteBook> for DeleteBookHandler {
    fn handle(&self, _ctx: &AppContext, cmd: DeleteBook) -> Result<String, AppError> {
        Ok(self.state.borrow_mut().catalogue.delete(&cmd.id)?)
    }
}

pub struct UpdateStockHandler {
    state: SharedState,
}

impl UpdateStockHandler {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl CommandHandler<UpdateStock> for UpdateStockHandler {
    fn handle(&self, _ctx: &AppContext, cmd: UpdateStock) -> Result<i64, AppError> {
        let id = BookId::resolve(&cmd.id)?;
        Ok(self.state.borrow_mut().catalogue.update_stock(id, cmd.delta)?)
    }
}
