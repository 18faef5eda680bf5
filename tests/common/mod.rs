#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Mutex;

use async_trait::async_trait;
use chart_pipeline::api::{ApplyOutcome, PipelineController};
use chart_pipeline::core::{ChartConfig, RenderablePayload, SourceFile};
use chart_pipeline::transport::{ChartService, GeneratedChart, Operation, TransportError};
use serde_json::json;

pub const SALES_FILE: &str = "sales.xlsx";
pub const REGIONS_FILE: &str = "regions.xlsx";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Sheets {
        file: String,
    },
    Columns {
        file: String,
        sheet: String,
    },
    Generate {
        file: String,
        sheet: String,
        config: ChartConfig,
    },
}

/// In-memory stand-in for the chart service with scripted metadata.
#[derive(Debug, Default)]
pub struct ScriptedService {
    sheets: HashMap<String, Vec<String>>,
    columns: HashMap<(String, String), Vec<String>>,
    failing: Mutex<HashSet<Operation>>,
    mismatched_shapes: Mutex<bool>,
    omitted_content_type: Mutex<bool>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedService {
    /// `sales.xlsx` has `Sheet1` (Category, Sales) and `Sheet2` (Region, Profit);
    /// `regions.xlsx` has a single `Regions` sheet; the built-in sample is one sheet.
    pub fn new() -> Self {
        Self::default()
            .with_sheet(SALES_FILE, "Sheet1", &["Category", "Sales"])
            .with_sheet(SALES_FILE, "Sheet2", &["Region", "Profit"])
            .with_sheet(REGIONS_FILE, "Regions", &["Region", "Headcount"])
            .with_sheet("sample.csv", "Sheet1", &["Category", "Sales", "Profit", "Region"])
    }

    pub fn with_sheet(mut self, file: &str, sheet: &str, columns: &[&str]) -> Self {
        self.sheets
            .entry(file.to_owned())
            .or_default()
            .push(sheet.to_owned());
        self.columns.insert(
            (file.to_owned(), sheet.to_owned()),
            columns.iter().map(|c| (*c).to_owned()).collect(),
        );
        self
    }

    pub fn fail(&self, operation: Operation) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        self.failing.lock().unwrap().remove(&operation);
    }

    /// Makes generation answer with the opposite shape of the requested format.
    pub fn mismatch_shapes(&self, enabled: bool) {
        *self.mismatched_shapes.lock().unwrap() = enabled;
    }

    /// Makes binary generation answer without a `Content-Type`.
    pub fn omit_content_type(&self, enabled: bool) {
        *self.omitted_content_type.lock().unwrap() = enabled;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn generate_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, Call::Generate { .. }))
            .count()
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        calls.len()
    }

    fn check(&self, operation: Operation) -> Result<(), TransportError> {
        if self.failing.lock().unwrap().contains(&operation) {
            return Err(TransportError::new(operation, "simulated outage"));
        }
        Ok(())
    }
}

#[async_trait]
impl ChartService for ScriptedService {
    async fn discover_sheets(&self, file: &SourceFile) -> Result<Vec<String>, TransportError> {
        self.record(Call::Sheets {
            file: file.name().to_owned(),
        });
        self.check(Operation::DiscoverSheets)?;
        self.sheets.get(file.name()).cloned().ok_or_else(|| {
            TransportError::new(Operation::DiscoverSheets, "HTTP 400: unreadable file")
        })
    }

    async fn discover_columns(
        &self,
        file: &SourceFile,
        sheet: &str,
    ) -> Result<Vec<String>, TransportError> {
        self.record(Call::Columns {
            file: file.name().to_owned(),
            sheet: sheet.to_owned(),
        });
        self.check(Operation::DiscoverColumns)?;
        self.columns
            .get(&(file.name().to_owned(), sheet.to_owned()))
            .cloned()
            .ok_or_else(|| TransportError::new(Operation::DiscoverColumns, "HTTP 404: no sheet"))
    }

    async fn generate_chart(
        &self,
        file: &SourceFile,
        sheet: &str,
        config: &ChartConfig,
    ) -> Result<GeneratedChart, TransportError> {
        let n = self.record(Call::Generate {
            file: file.name().to_owned(),
            sheet: sheet.to_owned(),
            config: config.clone(),
        });
        self.check(Operation::GenerateChart)?;

        let binary = config.format.is_binary() != *self.mismatched_shapes.lock().unwrap();
        if binary {
            return Ok(GeneratedChart::Binary {
                bytes: format!("{}-bytes-{n}", config.format.code()).into_bytes(),
                content_type: (!*self.omitted_content_type.lock().unwrap())
                    .then(|| config.format.fallback_media_type().to_owned()),
            });
        }
        Ok(GeneratedChart::Payload(RenderablePayload::new(
            vec![json!({
                "type": config.kind.as_str(),
                "x": config.x_column,
                "y": config.effective_y_column(),
                "marker": {"color": config.color.to_hex()},
            })],
            json!({"title": {"text": config.title}}),
        )))
    }
}

pub fn sales_file() -> SourceFile {
    SourceFile::new(SALES_FILE, "", b"PK\x03\x04 sales workbook".to_vec()).expect("sales file")
}

pub fn regions_file() -> SourceFile {
    SourceFile::new(REGIONS_FILE, "", b"PK\x03\x04 regions workbook".to_vec())
        .expect("regions file")
}

pub fn unreadable_file() -> SourceFile {
    SourceFile::new("broken.xlsx", "", b"garbage".to_vec()).expect("broken file")
}

/// Runs `sales.xlsx` through sheet and column discovery for `sheet`.
pub async fn controller_with_columns(sheet: &str) -> PipelineController<ScriptedService> {
    let mut controller = PipelineController::new(ScriptedService::new());
    let pending = controller.submit_file(sales_file());
    assert_eq!(controller.drive(pending).await, ApplyOutcome::Applied);
    let pending = controller.select_sheet(sheet).expect("sheet selectable");
    assert_eq!(controller.drive(pending).await, ApplyOutcome::Applied);
    controller
}

/// Blocks on `future` with a current-thread runtime, for use inside `proptest!`.
pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(future)
}
