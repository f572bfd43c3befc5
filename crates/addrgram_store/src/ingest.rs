// Файл: crates/addrgram_store/src/ingest.rs
use addrgram::{Field, Record};
use anyhow::{Context, Result};
use encoding_rs::Encoding;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::StoreError;

/// Порядок колонок CSV: code, затем поля в каноническом порядке
pub const CSV_COLUMNS: usize = 1 + addrgram::record::FIELD_COUNT;

/// Загрузить записи: `.jsonl`/`.json` — построчно serde, `.csv` — таблица в `encoding`
pub fn load_records(path: &Path, encoding: &str) -> Result<Vec<Record>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jsonl" | "json" => read_jsonl(path),
        "csv" => {
            let bytes =
                std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
            read_csv(&bytes, encoding)
        }
        _ => Err(StoreError::UnsupportedInput(path.to_path_buf()).into()),
    }
}

pub fn read_jsonl(path: &Path) -> Result<Vec<Record>> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let br = BufReader::new(f);
    let mut out = Vec::new();
    for (i, line) in br.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let r: Record = serde_json::from_str(&line).map_err(|e| StoreError::MalformedRow {
            line: i + 1,
            reason: e.to_string(),
        })?;
        out.push(r);
    }
    Ok(out)
}

/// Разобрать CSV-байты. Первая строка с `code` в первой ячейке — заголовок.
/// Ячейки в кавычках могут содержать запятые и переводы строк.
pub fn read_csv(bytes: &[u8], encoding: &str) -> Result<Vec<Record>> {
    let text = decode(bytes, encoding)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut out = Vec::new();
    for row in rdr.records() {
        let row = row.map_err(|e| StoreError::MalformedRow {
            line: e.position().map_or(0, |p| p.line() as usize),
            reason: e.to_string(),
        })?;
        let line = row.position().map_or(0, |p| p.line() as usize);
        // строка из одних пробелов
        if row.len() == 1 && row[0].is_empty() {
            continue;
        }
        if out.is_empty() && row.get(0) == Some("code") {
            continue;
        }
        if row.len() != CSV_COLUMNS {
            return Err(StoreError::MalformedRow {
                line,
                reason: format!("expected {CSV_COLUMNS} columns, found {}", row.len()),
            }
            .into());
        }
        let mut cells = row.iter();
        let mut r = Record::new(cells.next().unwrap_or_default());
        for (field, value) in Field::ALL.into_iter().zip(cells) {
            r = r.with(field, value);
        }
        out.push(r);
    }
    Ok(out)
}

/// Декодировать по метке (`utf-8`, `shift_jis`, `euc-jp`, ...); BOM снимается
pub fn decode(bytes: &[u8], label: &str) -> Result<String> {
    let enc = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| StoreError::UnknownEncoding(label.to_string()))?;
    let (text, used, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(StoreError::Decode {
            encoding: used.name(),
        }
        .into());
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_cells_keep_commas_quotes_and_newlines() {
        let src = "1508501,東京都,渋谷区,神宮前,,５丁目,\"東京都渋谷\n都税事務所\",５－１－２\n\
                   1638001,東京都,新宿区,西新宿,,\"2,8\",\"say \"\"hi\"\"\", c \n";
        let recs = read_csv(src.as_bytes(), "utf-8").unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].field(Field::OrgName), "東京都渋谷\n都税事務所");
        assert_eq!(recs[0].field(Field::OrgAddress), "５－１－２");
        assert_eq!(recs[1].field(Field::Block), "2,8");
        assert_eq!(recs[1].field(Field::OrgName), r#"say "hi""#);
        assert_eq!(recs[1].field(Field::OrgAddress), "c");
    }

    #[test]
    fn malformed_row_reports_its_starting_line() {
        // первая запись занимает строки 1-2, битая — строка 3
        let src = "1,東京都,渋谷区,,,,\"a\nb\",\n2,東京都\n";
        let err = read_csv(src.as_bytes(), "utf-8").unwrap_err();
        match err.downcast_ref::<StoreError>() {
            Some(StoreError::MalformedRow { line, .. }) => assert_eq!(*line, 3),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn csv_with_header_and_empty_columns() {
        let src = "code,prefecture,city,town,street,block,org_name,org_address\n\
                   1500002,東京都,渋谷区,渋谷,,,,\n\
                   \n\
                   1508501,東京都,渋谷区,神宮前,,５丁目,東京都渋谷都税事務所,５－１－２\n";
        let recs = read_csv(src.as_bytes(), "utf-8").unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].field(Field::Town), "渋谷");
        assert_eq!(recs[0].field(Field::Street), "");
        assert_eq!(recs[1].field(Field::OrgAddress), "５－１－２");
    }

    #[test]
    fn csv_shift_jis_is_decoded() {
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("6008216,京都府,京都市下京区,東塩小路町,,,,\n");
        let recs = read_csv(&bytes, "shift_jis").unwrap();
        assert_eq!(recs[0].field(Field::Prefecture), "京都府");
        assert_eq!(recs[0].code(), "6008216");
    }

    #[test]
    fn bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("code,prefecture,city,town,street,block,org_name,org_address\n1,北海道,,,,,,\n".as_bytes());
        let recs = read_csv(&bytes, "utf-8").unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].code(), "1");
    }

    #[test]
    fn wrong_column_count_is_rejected() {
        let err = read_csv("1,東京都,渋谷区\n".as_bytes(), "utf-8").unwrap_err();
        match err.downcast_ref::<StoreError>() {
            Some(StoreError::MalformedRow { line, .. }) => assert_eq!(*line, 1),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = decode(b"abc", "klingon").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let err = decode(b"abc\xff", "utf-8").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Decode { .. })
        ));
    }
}
