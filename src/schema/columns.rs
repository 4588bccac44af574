// src/schema/columns.rs

use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{Array, ArrayRef, Float64Array, Int64Array, StringArray},
    compute::cast,
    datatypes::{DataType, Field, Schema as ArrowSchema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use crate::error::RecordError;
use crate::process::utils::clean_cell;
use crate::record::{CleanRecord, OrderId, RawRecord};

/// Column names of the raw orders table.
pub const RAW_COLUMNS: [&str; 8] = [
    "order_id",
    "customer_name",
    "email",
    "product_name",
    "quantity",
    "price",
    "country",
    "order_status",
];

/// Column names of the cleaned table, in output order.
pub const CLEAN_COLUMNS: [&str; 8] = [
    "order_id",
    "new_customer_name",
    "email",
    "cleaned_product_name",
    "cleaned_quantity",
    "price",
    "country",
    "order_status",
];

/// Arrow schema of the cleaned table. Only `price` is nullable.
pub fn clean_arrow_schema() -> Arc<ArrowSchema> {
    Arc::new(ArrowSchema::new(vec![
        Field::new(CLEAN_COLUMNS[0], DataType::Utf8, false),
        Field::new(CLEAN_COLUMNS[1], DataType::Utf8, false),
        Field::new(CLEAN_COLUMNS[2], DataType::Utf8, false),
        Field::new(CLEAN_COLUMNS[3], DataType::Utf8, false),
        Field::new(CLEAN_COLUMNS[4], DataType::Int64, false),
        Field::new(CLEAN_COLUMNS[5], DataType::Float64, true),
        Field::new(CLEAN_COLUMNS[6], DataType::Utf8, false),
        Field::new(CLEAN_COLUMNS[7], DataType::Utf8, false),
    ]))
}

/// Build one batch holding every cleaned record.
pub fn records_to_batch(records: &[CleanRecord]) -> Result<RecordBatch> {
    let arrays: Vec<ArrayRef> = vec![
        string_array(records, |r| r.order_id.as_str()),
        string_array(records, |r| r.customer_name.as_str()),
        string_array(records, |r| r.email.as_str()),
        string_array(records, |r| r.product_name.as_str()),
        Arc::new(Int64Array::from_iter_values(
            records.iter().map(|r| r.quantity),
        )),
        Arc::new(Float64Array::from_iter(records.iter().map(|r| r.price))),
        string_array(records, |r| r.country.as_str()),
        string_array(records, |r| r.order_status.as_str()),
    ];
    RecordBatch::try_new(clean_arrow_schema(), arrays).context("building cleaned record batch")
}

fn string_array<'a, F>(records: &'a [CleanRecord], field: F) -> ArrayRef
where
    F: Fn(&'a CleanRecord) -> &'a str,
{
    Arc::new(StringArray::from_iter_values(records.iter().map(field)))
}

/// Named column cast to Utf8, or `None` when the batch lacks it.
fn utf8_column(batch: &RecordBatch, name: &str) -> Result<Option<StringArray>> {
    let Ok(idx) = batch.schema().index_of(name) else {
        return Ok(None);
    };
    let casted = cast(batch.column(idx), &DataType::Utf8)
        .with_context(|| format!("casting column {} to Utf8", name))?;
    casted
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .map(Some)
        .ok_or_else(|| anyhow!("column {} did not cast to a string array", name))
}

/// Trimmed cell text; nulls and blank cells are `None`.
fn cell(col: &Option<StringArray>, row: usize) -> Option<String> {
    col.as_ref()
        .filter(|c| c.is_valid(row))
        .and_then(|c| clean_cell(Some(c.value(row))))
}

/// Decode a raw-orders batch. Rows with an unparseable price become
/// `Unreadable` errors; `first_row` is the 1-based row number of the
/// batch's first row within `file`.
pub fn batch_to_raw(
    batch: &RecordBatch,
    file: &str,
    first_row: usize,
    errors: &mut Vec<RecordError>,
) -> Result<Vec<RawRecord>> {
    let cols = RAW_COLUMNS
        .iter()
        .map(|name| utf8_column(batch, name))
        .collect::<Result<Vec<_>>>()?;

    let mut out = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let price = match cell(&cols[5], row) {
            None => None,
            Some(text) => match text.parse::<f64>() {
                Ok(p) => Some(p),
                Err(e) => {
                    errors.push(RecordError::Unreadable {
                        file: file.to_string(),
                        row: first_row + row,
                        message: format!("price {:?}: {}", text, e),
                    });
                    continue;
                }
            },
        };
        out.push(RawRecord {
            order_id: cell(&cols[0], row),
            customer_name: cell(&cols[1], row),
            email: cell(&cols[2], row),
            product_name: cell(&cols[3], row),
            quantity: cell(&cols[4], row),
            price,
            country: cell(&cols[6], row),
            order_status: cell(&cols[7], row),
        });
    }
    Ok(out)
}

fn typed_column<T: Array + Clone + 'static>(batch: &RecordBatch, name: &str) -> Result<T> {
    let idx = batch
        .schema()
        .index_of(name)
        .with_context(|| format!("cleaned table has no column {}", name))?;
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| anyhow!("column {} has type {}", name, batch.column(idx).data_type()))
}

/// Decode a cleaned-table batch, as written by [`records_to_batch`].
pub fn batch_to_clean(batch: &RecordBatch) -> Result<Vec<CleanRecord>> {
    let order_id: StringArray = typed_column(batch, CLEAN_COLUMNS[0])?;
    let name: StringArray = typed_column(batch, CLEAN_COLUMNS[1])?;
    let email: StringArray = typed_column(batch, CLEAN_COLUMNS[2])?;
    let product: StringArray = typed_column(batch, CLEAN_COLUMNS[3])?;
    let quantity: Int64Array = typed_column(batch, CLEAN_COLUMNS[4])?;
    let price: Float64Array = typed_column(batch, CLEAN_COLUMNS[5])?;
    let country: StringArray = typed_column(batch, CLEAN_COLUMNS[6])?;
    let status: StringArray = typed_column(batch, CLEAN_COLUMNS[7])?;

    Ok((0..batch.num_rows())
        .map(|i| CleanRecord {
            order_id: OrderId::new(order_id.value(i)),
            customer_name: name.value(i).to_string(),
            email: email.value(i).to_string(),
            product_name: product.value(i).to_string(),
            quantity: quantity.value(i),
            price: price.is_valid(i).then(|| price.value(i)),
            country: country.value(i).to_string(),
            order_status: status.value(i).to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<CleanRecord> {
        vec![
            CleanRecord {
                order_id: OrderId::from(1),
                customer_name: "John Smith".into(),
                email: "a@x.com".into(),
                product_name: "iPhone 14".into(),
                quantity: 2,
                price: Some(999.5),
                country: "Usa".into(),
                order_status: "Delivered".into(),
            },
            CleanRecord {
                order_id: OrderId::from(3),
                customer_name: "Ann Lee".into(),
                email: "b@x.com".into(),
                product_name: "Other".into(),
                quantity: 1,
                price: None,
                country: "".into(),
                order_status: "Other".into(),
            },
        ]
    }

    #[test]
    fn batch_has_output_columns() -> Result<()> {
        let batch = records_to_batch(&sample())?;
        let names: Vec<String> = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        assert_eq!(names, CLEAN_COLUMNS.map(String::from).to_vec());
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch_to_clean(&batch)?, sample());
        Ok(())
    }

    #[test]
    fn raw_batch_with_numeric_ids_and_bad_price() -> Result<()> {
        let schema = Arc::new(ArrowSchema::new(vec![
            Field::new("order_id", DataType::Int64, false),
            Field::new("customer_name", DataType::Utf8, true),
            Field::new("price", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![10, 11, 12])),
                Arc::new(StringArray::from(vec![Some("ann"), None, Some("bo")])),
                Arc::new(StringArray::from(vec![Some("9.5"), None, Some("n/a")])),
            ],
        )?;
        let mut errors = Vec::new();
        let rows = batch_to_raw(&batch, "in.parquet", 1, &mut errors)?;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].order_id.as_deref(), Some("10"));
        assert_eq!(rows[0].price, Some(9.5));
        assert_eq!(rows[1].customer_name, None);
        assert_eq!(rows[1].email, None);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            RecordError::Unreadable { row: 3, .. }
        ));
        Ok(())
    }
}
