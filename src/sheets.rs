//! Sheet source: the fallible fetch of one student's raw table.

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::fetch::{HttpClient, fetch_bytes};
use crate::parser::{RawTable, parse_table};
use crate::roster::StudentAccount;

/// Delivers the raw table for one student. Implementations may hit the
/// network; batch tests substitute canned tables at this seam.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_table(&self, student: &StudentAccount) -> Result<RawTable>;
}

/// Fetches each student's sheet export over HTTP and parses it as CSV.
pub struct HttpSheetSource<C> {
    client: C,
}

impl<C: HttpClient> HttpSheetSource<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: HttpClient> SheetSource for HttpSheetSource<C> {
    async fn fetch_table(&self, student: &StudentAccount) -> Result<RawTable> {
        let url = student
            .sheet_url
            .as_deref()
            .ok_or_else(|| anyhow!("no sheet configured for student {}", student.id))?;
        let bytes = fetch_bytes(&self.client, url).await?;
        parse_table(&bytes)
    }
}
