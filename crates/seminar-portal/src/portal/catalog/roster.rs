//! CSV rendering of the applicant roster.
//!
//! The export targets spreadsheet tools used by seminar hosts, hence the
//! UTF-8 BOM and the Korean column headers the portal has always shipped.

use super::service::CatalogError;
use crate::portal::directory::UserProfile;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Column headers: name, department, email, username.
pub const CSV_HEADER: [&str; 4] = ["이름", "부서", "이메일", "사용자명"];

/// Render the roster as CSV bytes, BOM included.
pub fn applicants_csv(applicants: &[UserProfile]) -> Result<Vec<u8>, CatalogError> {
    let mut buffer = Vec::from(UTF8_BOM);
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(CSV_HEADER)?;
        for applicant in applicants {
            writer.write_record([
                applicant.full_name.as_str(),
                applicant.department.as_str(),
                applicant.email.as_str(),
                applicant.username.as_str(),
            ])?;
        }
        writer.flush().map_err(csv::Error::from)?;
    }
    Ok(buffer)
}
