use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use thiserror::Error;

use crate::forecast::{DEFAULT_PERIODS, ForecastUpload};

const FALLBACK_FILE_NAME: &str = "upload.csv";

#[derive(MultipartForm)]
/// Multipart form for `POST /forecast/upload`.
pub struct UploadForecastForm {
    #[multipart(rename = "csvFile", limit = "10MB")]
    /// CSV with a date column and a quantity/value column. Its layout is
    /// checked by the forecasting service.
    pub csv_file: Option<TempFile>,
    /// Days to predict; blank or zero means the default horizon.
    pub periods: Option<Text<String>>,
}

#[derive(Debug, Error)]
pub enum UploadForecastFormError {
    #[error("No CSV file provided")]
    MissingFile,
    #[error("Error reading csv file")]
    FileReadError,
    #[error("periods must be a non-negative integer, got `{0}`")]
    InvalidPeriods(String),
}

impl From<std::io::Error> for UploadForecastFormError {
    fn from(_: std::io::Error) -> Self {
        UploadForecastFormError::FileReadError
    }
}

impl UploadForecastForm {
    /// Read the uploaded file and resolve the horizon.
    pub fn into_upload(self) -> Result<ForecastUpload, UploadForecastFormError> {
        let periods = parse_periods(self.periods.as_ref().map(|text| text.as_str()))?;

        let mut csv_file = self.csv_file.ok_or(UploadForecastFormError::MissingFile)?;
        csv_file.file.rewind()?;
        let mut csv = Vec::with_capacity(csv_file.size);
        csv_file.file.read_to_end(&mut csv)?;

        if csv.is_empty() {
            return Err(UploadForecastFormError::MissingFile);
        }

        let file_name = csv_file
            .file_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());

        Ok(ForecastUpload {
            file_name,
            csv,
            periods,
        })
    }
}

fn parse_periods(value: Option<&str>) -> Result<u32, UploadForecastFormError> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(DEFAULT_PERIODS);
    };

    match raw.parse::<u32>() {
        Ok(0) => Ok(DEFAULT_PERIODS),
        Ok(periods) => Ok(periods),
        Err(_) => Err(UploadForecastFormError::InvalidPeriods(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_csv(contents: &str, name: Option<&str>) -> TempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write csv");
        TempFile {
            file,
            content_type: None,
            file_name: name.map(str::to_string),
            size: contents.len(),
        }
    }

    #[test]
    fn parse_periods_defaults_to_thirty() {
        assert_eq!(parse_periods(None).unwrap(), 30);
        assert_eq!(parse_periods(Some("")).unwrap(), 30);
        assert_eq!(parse_periods(Some("0")).unwrap(), 30);
        assert_eq!(parse_periods(Some(" 14 ")).unwrap(), 14);
    }

    #[test]
    fn parse_periods_rejects_garbage() {
        assert!(matches!(
            parse_periods(Some("-5")),
            Err(UploadForecastFormError::InvalidPeriods(_))
        ));
        assert!(matches!(
            parse_periods(Some("ten")),
            Err(UploadForecastFormError::InvalidPeriods(_))
        ));
    }

    #[test]
    fn into_upload_reads_file_contents() {
        let csv = "date,quantity\n2024-01-01,5\n2024-01-02,7\n";
        let form = UploadForecastForm {
            csv_file: Some(temp_csv(csv, Some("sales.csv"))),
            periods: Some(Text("7".to_string())),
        };

        let upload = form.into_upload().expect("valid upload");

        assert_eq!(upload.file_name, "sales.csv");
        assert_eq!(upload.csv, csv.as_bytes());
        assert_eq!(upload.periods, 7);
    }

    #[test]
    fn into_upload_requires_a_non_empty_file() {
        let form = UploadForecastForm {
            csv_file: None,
            periods: None,
        };
        assert!(matches!(
            form.into_upload(),
            Err(UploadForecastFormError::MissingFile)
        ));

        let form = UploadForecastForm {
            csv_file: Some(temp_csv("", None)),
            periods: None,
        };
        assert!(matches!(
            form.into_upload(),
            Err(UploadForecastFormError::MissingFile)
        ));
    }

    #[test]
    fn into_upload_falls_back_to_default_file_name() {
        let form = UploadForecastForm {
            csv_file: Some(temp_csv("date,value\n2024-01-01,1\n", None)),
            periods: None,
        };

        let upload = form.into_upload().expect("valid upload");

        assert_eq!(upload.file_name, FALLBACK_FILE_NAME);
        assert_eq!(upload.periods, DEFAULT_PERIODS);
    }
}
