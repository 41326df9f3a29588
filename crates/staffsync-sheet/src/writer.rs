use crate::errors::SheetError;

/// Serialize a fixed-header table to CSV bytes.
///
/// The output starts with a UTF-8 BOM so spreadsheet applications detect
/// the encoding and render Arabic headers correctly.
pub fn write_table(headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>, SheetError> {
    let mut out = Vec::new();
    out.extend_from_slice(b"\xEF\xBB\xBF");

    let mut writer = csv::Writer::from_writer(&mut out);
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    drop(writer);

    Ok(out)
}
