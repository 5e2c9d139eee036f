use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::commission::CommissionPolicy;
use crate::domain::model::{
    CommissionedRecord, RawBatch, RejectedRow, SalesRow, SalesSummary, TransformResult,
    REPORT_HEADERS,
};
use crate::utils::error::{EtlError, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

pub struct CommissionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CommissionPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

/// The demo table the slides run their mini ETL on.
pub fn sample_rows() -> Vec<SalesRow> {
    let rows = [
        ("Ana", 15000.0, 12000.0, "Senior", "Premium"),
        ("Bruno", 8000.0, 10000.0, "Junior", "Standard"),
        ("Carlos", 22000.0, 15000.0, "Senior", "Premium"),
        ("Diana", 18000.0, 15000.0, "Mid", "Standard"),
        ("Eduardo", 5000.0, 10000.0, "Junior", "Standard"),
    ];

    rows.iter()
        .enumerate()
        .map(|(i, (name, amount, target, seniority, category))| SalesRow {
            line: i as u64 + 2,
            ..SalesRow::new(name, *amount, *target, seniority, category)
        })
        .collect()
}

pub fn delimiter_for(path: &str) -> u8 {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

/// Parses a sales file. Lines that cannot be decoded are rejected in skip
/// mode and abort the parse otherwise.
pub fn parse_sales_csv(data: &[u8], delimiter: u8, skip_invalid: bool) -> Result<RawBatch> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(data);
    let headers = reader.headers()?.clone();
    let mut batch = RawBatch::default();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if skip_invalid => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                tracing::warn!("⚠️ Skipping unreadable line {}: {}", line, e);
                batch.rejected.push(RejectedRow {
                    line,
                    salesperson: String::new(),
                    reason: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        match record.deserialize::<SalesRow>(Some(&headers)) {
            Ok(mut row) => {
                row.line = line;
                batch.rows.push(row);
            }
            Err(e) if skip_invalid => {
                tracing::warn!("⚠️ Skipping malformed line {}: {}", line, e);
                batch.rejected.push(RejectedRow {
                    line,
                    salesperson: record.get(0).unwrap_or_default().to_string(),
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                return Err(EtlError::invalid_input(
                    format!("line {}", line),
                    record.iter().collect::<Vec<_>>().join(","),
                    e.to_string(),
                ));
            }
        }
    }

    Ok(batch)
}

pub fn apply_commission(policy: &CommissionPolicy, row: &SalesRow) -> Result<CommissionedRecord> {
    let record = row.to_record()?;
    let breakdown = policy.breakdown(&record)?;

    Ok(CommissionedRecord {
        salesperson: row.salesperson.clone(),
        amount_sold: record.amount_sold,
        target: record.target,
        seniority: record.seniority,
        category: record.category,
        met_target: record.met_target(),
        commission_rate: breakdown.final_rate,
        commission: breakdown.commission,
    })
}

pub fn render_delimited(records: &[CommissionedRecord], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::new());

    // 即使沒有資料也要輸出表頭
    writer.write_record(REPORT_HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("Failed to flush report: {}", e),
    })
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a SalesSummary,
    records: &'a [CommissionedRecord],
    rejected: &'a [RejectedRow],
}

pub fn render_json(result: &TransformResult) -> Result<Vec<u8>> {
    let report = JsonReport {
        summary: &result.summary,
        records: &result.records,
        rejected: &result.rejected,
    };
    Ok(serde_json::to_vec_pretty(&report)?)
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CommissionPipeline<S, C> {
    async fn extract(&self) -> Result<RawBatch> {
        let Some(input) = self.config.input_path() else {
            tracing::info!("No input file configured, using built-in sample data");
            return Ok(RawBatch {
                rows: sample_rows(),
                rejected: Vec::new(),
            });
        };

        tracing::debug!("Reading sales records from: {}", input);
        let data = self.storage.read_file(input).await?;
        tracing::debug!("Read {} bytes from {}", data.len(), input);

        parse_sales_csv(&data, delimiter_for(input), self.config.skip_invalid_records())
    }

    async fn transform(&self, batch: RawBatch) -> Result<TransformResult> {
        let policy = *self.config.policy();

        let outcomes: Vec<Result<CommissionedRecord>> = if self.config.parallel() {
            tracing::debug!("Applying commission policy in parallel");
            batch
                .rows
                .par_iter()
                .map(|row| apply_commission(&policy, row))
                .collect()
        } else {
            batch
                .rows
                .iter()
                .map(|row| apply_commission(&policy, row))
                .collect()
        };

        let mut records = Vec::with_capacity(outcomes.len());
        let mut rejected = batch.rejected;

        for (row, outcome) in batch.rows.iter().zip(outcomes) {
            match outcome {
                Ok(record) => records.push(record),
                Err(e) if self.config.skip_invalid_records() => {
                    tracing::warn!(
                        "⚠️ Skipping invalid record on line {} ({}): {}",
                        row.line,
                        row.salesperson,
                        e
                    );
                    rejected.push(RejectedRow {
                        line: row.line,
                        salesperson: row.salesperson.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::error!("Invalid record on line {}: {}", row.line, e);
                    return Err(e);
                }
            }
        }

        rejected.sort_by_key(|r| r.line);
        let summary = SalesSummary::from_records(&records, rejected.len());

        if summary.zero_target_count > 0 {
            tracing::warn!(
                "⚠️ {} record(s) have a target of 0 and were treated as having met it; confirm this with the policy owner",
                summary.zero_target_count
            );
        }

        tracing::info!(
            "💰 {} records, total sales {:.2}, total commission {:.2}, {:.0}% met target",
            summary.record_count,
            summary.total_sales,
            summary.total_commission,
            summary.met_target_percent
        );

        Ok(TransformResult {
            records,
            rejected,
            summary,
        })
    }

    async fn load(&self, result: &TransformResult) -> Result<String> {
        let mut outputs: Vec<(String, Vec<u8>)> = Vec::new();

        for format in self.config.output_formats() {
            let data = match format.as_str() {
                "csv" => render_delimited(&result.records, b',')?,
                "tsv" => render_delimited(&result.records, b'\t')?,
                "json" => render_json(result)?,
                other => {
                    return Err(EtlError::InvalidConfigValueError {
                        field: "output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported output format".to_string(),
                    })
                }
            };
            outputs.push((self.config.report_filename(format), data));
        }

        let output_dir = self.config.output_path();

        if let Some(archive) = self.config.archive_name() {
            tracing::debug!("Creating ZIP file with {} files", outputs.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &outputs {
                    zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                    zip.write_all(data)?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            let archive_path = format!("{}/{}", output_dir, archive);
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(&archive_path, &zip_data).await?;
            return Ok(archive_path);
        }

        for (name, data) in &outputs {
            let path = format!("{}/{}", output_dir, name);
            tracing::debug!("Writing {} ({} bytes)", path, data.len());
            self.storage.write_file(&path, data).await?;
        }

        Ok(output_dir.to_string())
    }
}
