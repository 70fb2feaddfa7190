use config_migrator_pipeline::errors::ProcessorError;
use config_migrator_pipeline::processor::HandleSource;
use config_migrator_shared::types::{BlacklistEntry, Changeset, SourceFile};
use csv::{ReaderBuilder, Trim};
use std::collections::HashSet;

/// Parses blacklists: one number per line in text files, the first field
/// of every record in CSV files. Lines starting with `#` are comments.
pub struct BlacklistHandler;

impl HandleSource for BlacklistHandler {
    fn handle(&self, file: &SourceFile) -> Result<Changeset, ProcessorError> {
        let numbers = if file.extension().as_deref() == Some("csv") {
            csv_numbers(&file.contents)?
        } else {
            file.contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string)
                .collect()
        };

        let mut seen = HashSet::new();
        let blacklist = numbers
            .into_iter()
            .filter(|number| !number.is_empty() && seen.insert(number.clone()))
            .map(|phone_number| BlacklistEntry { phone_number })
            .collect();

        Ok(Changeset {
            blacklist,
            ..Default::default()
        })
    }
}

fn csv_numbers(contents: &str) -> Result<Vec<String>, ProcessorError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(Trim::All)
        .from_reader(contents.as_bytes());

    let mut numbers = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ProcessorError::Csv(e.to_string()))?;
        if let Some(first) = record.get(0) {
            numbers.push(first.to_string());
        }
    }
    Ok(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_migrator_shared::types::JobKind;

    fn numbers(changeset: &Changeset) -> Vec<&str> {
        changeset.blacklist.iter().map(|e| e.phone_number.as_str()).collect()
    }

    #[test]
    fn test_text_blacklist() {
        let contents = "# spam callers\n+15551234567\n\n  +15557654321  \n+15551234567\n";
        let file = SourceFile::new(JobKind::Blacklist, "/etc/freeswitch/blacklist/spam.txt", 1, contents);

        let changeset = BlacklistHandler.handle(&file).unwrap();

        assert_eq!(numbers(&changeset), vec!["+15551234567", "+15557654321"]);
    }

    #[test]
    fn test_csv_takes_first_field() {
        let contents = "#number,reason\n5551000,robocall\n5552000 , telemarketer\n,empty\n";
        let file = SourceFile::new(JobKind::Blacklist, "/etc/freeswitch/blacklist/list.csv", 1, contents);

        let changeset = BlacklistHandler.handle(&file).unwrap();

        assert_eq!(numbers(&changeset), vec!["5551000", "5552000"]);
    }

    #[test]
    fn test_csv_quoted_fields() {
        let contents = "\"+1 555 0100\",robocall\n\"555,0200\",\"spam, repeated\"\n5551000\n\"555,0200\",again\n";
        let file = SourceFile::new(JobKind::Blacklist, "/etc/freeswitch/blacklist/quoted.csv", 1, contents);

        let changeset = BlacklistHandler.handle(&file).unwrap();

        assert_eq!(numbers(&changeset), vec!["+1 555 0100", "555,0200", "5551000"]);
    }

    #[test]
    fn test_commas_in_text_files_are_kept() {
        let file = SourceFile::new(JobKind::Blacklist, "/etc/freeswitch/blacklist/odd.txt", 1, "555,1000\n");

        let changeset = BlacklistHandler.handle(&file).unwrap();

        assert_eq!(numbers(&changeset), vec!["555,1000"]);
    }
}
