//! Test fixtures and data factories

use async_trait::async_trait;
use imexport_rs::core::codec::{RecordBinding, TabularRecord, parse_cell};
use imexport_rs::core::provider::{ExportProvider, RowProcessor, TemplateProvider};
use imexport_rs::{BusinessWiring, PipelineError, Result};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

pub const USER_HEADER: &str = "Username,Email,Phone,Age,Department";

/// A valid user row for index `n`
pub fn user_row(n: usize) -> String {
    format!(
        "user{n},user{n}@example.com,139{n:08},{age},QA",
        age = 20 + n
    )
}

/// User CSV with `rows` data rows; rows listed in `bad_email` get an invalid email
pub fn user_csv(rows: usize, bad_email: &[usize]) -> String {
    let mut csv = String::from(USER_HEADER);
    csv.push('\n');
    for n in 1..=rows {
        if bad_email.contains(&n) {
            csv.push_str(&format!("user{n},not-an-email,,30,QA"));
        } else {
            csv.push_str(&user_row(n));
        }
        csv.push('\n');
    }
    csv
}

pub const PRODUCT_BUSINESS: &str = "product";
pub const PRODUCT_IMPORT: &str = "PRODUCT_IMPORT";
pub const PRODUCT_EXPORT: &str = "PRODUCT_EXPORT";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductRecord {
    pub sku: String,
    pub name: String,
    pub price: f64,
}

impl TabularRecord for ProductRecord {
    fn binding() -> RecordBinding<Self> {
        RecordBinding::<Self>::new()
            .field(
                "SKU",
                |p| p.sku.clone(),
                |p, v| {
                    p.sku = v.to_string();
                    Ok(())
                },
            )
            .field(
                "Name",
                |p| p.name.clone(),
                |p, v| {
                    p.name = v.to_string();
                    Ok(())
                },
            )
            .field(
                "Price",
                |p| p.price.to_string(),
                |p, v| {
                    p.price = parse_cell(v)?;
                    Ok(())
                },
            )
    }
}

pub fn product(n: usize) -> ProductRecord {
    ProductRecord {
        sku: format!("SKU-{:04}", n),
        name: format!("Product {}", n),
        price: n as f64 + 0.5,
    }
}

/// Product CSV; rows listed in `negative` carry a negative price
pub fn product_csv(rows: usize, negative: &[usize]) -> String {
    let mut csv = String::from("SKU,Name,Price\n");
    for n in 1..=rows {
        let price = if negative.contains(&n) { -1.0 } else { n as f64 + 0.5 };
        csv.push_str(&format!("SKU-{:04},Product {},{}\n", n, n, price));
    }
    csv
}

/// Product catalog acting as export source and import sink
#[derive(Default)]
pub struct ProductCatalog {
    products: Mutex<Vec<ProductRecord>>,
    batches: Mutex<usize>,
    fail_sink: bool,
}

impl ProductCatalog {
    pub fn with_products(products: Vec<ProductRecord>) -> Self {
        Self {
            products: Mutex::new(products),
            ..Self::default()
        }
    }

    /// Catalog whose sink always rejects the batch
    pub fn failing_sink() -> Self {
        Self {
            fail_sink: true,
            ..Self::default()
        }
    }

    pub fn products(&self) -> Vec<ProductRecord> {
        self.products.lock().clone()
    }

    /// Number of sink invocations so far
    pub fn batches(&self) -> usize {
        *self.batches.lock()
    }
}

#[async_trait]
impl ExportProvider<ProductRecord> for ProductCatalog {
    fn business_type(&self) -> &str {
        PRODUCT_EXPORT
    }

    fn export_file_name(&self) -> &str {
        "product_export"
    }

    async fn query_export_data(&self, params: &Value) -> Result<Vec<ProductRecord>> {
        let min_price = params.get("minPrice").and_then(Value::as_f64).unwrap_or(f64::MIN);
        Ok(self
            .products
            .lock()
            .iter()
            .filter(|p| p.price >= min_price)
            .cloned()
            .collect())
    }
}

impl TemplateProvider<ProductRecord> for ProductCatalog {
    fn business_type(&self) -> &str {
        PRODUCT_IMPORT
    }

    fn template_file_name(&self) -> &str {
        "product_import"
    }
}

#[async_trait]
impl RowProcessor<ProductRecord> for ProductCatalog {
    fn business_type(&self) -> &str {
        PRODUCT_IMPORT
    }

    fn validate_row(&self, record: &ProductRecord, _row_index: usize) -> Option<String> {
        if record.sku.trim().is_empty() {
            return Some("SKU is required".to_string());
        }
        if record.price < 0.0 {
            return Some("Price must not be negative".to_string());
        }
        None
    }

    async fn process_valid_rows(&self, records: Vec<ProductRecord>) -> Result<()> {
        *self.batches.lock() += 1;
        if self.fail_sink {
            return Err(PipelineError::sink("catalog is read-only"));
        }
        self.products.lock().extend(records);
        Ok(())
    }
}

pub fn product_wiring(catalog: Arc<ProductCatalog>) -> BusinessWiring<ProductRecord> {
    BusinessWiring::new(PRODUCT_BUSINESS)
        .with_exporter(catalog.clone())
        .with_processor(catalog.clone())
        .with_template(catalog)
}
