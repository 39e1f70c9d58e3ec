use std::io::Read;

use super::domain::{Case, CountryScores, ScoreBundle};
use super::store::CaseStoreError;

const DIMENSION_SUFFIXES: [&str; 4] = ["_emotional", "_cultural", "_ethical", "_weighted"];

const KNOWN_HOSTS: [(&str, &str); 5] = [
    ("united_states", "United States"),
    ("canada", "Canada"),
    ("germany", "Germany"),
    ("sweden", "Sweden"),
    ("australia", "Australia"),
];

/// Case attribute column paired with its feature name inside `profile_string`.
const ATTRIBUTES: [(&str, &str); 5] = [
    ("age_group", "Age"),
    ("gender", "Gender"),
    ("origin", "Country Of Origin"),
    ("education", "Education Level"),
    ("english", "Speaks English"),
];

#[derive(Debug, Clone, Copy)]
enum AttributeSource {
    Column(usize),
    /// `Feature Name: value; ...` text written by the batch assessment export.
    ProfileString(usize),
}

/// Column positions for one destination country.
#[derive(Debug)]
struct CountryColumns {
    name: String,
    // emotional, cultural, ethical, weighted
    positions: [Option<usize>; 4],
}

#[derive(Debug)]
struct Layout {
    id: usize,
    // same order as `ATTRIBUTES`
    attributes: [AttributeSource; 5],
    recommended_country: usize,
    countries: Vec<CountryColumns>,
}

/// Parses the batch-results table: one row per case with `<country>_<dimension>` columns.
/// Attributes come from their own columns when present, otherwise from `profile_string`.
pub(crate) fn parse_cases<R: Read>(reader: R) -> Result<Vec<Case>, CaseStoreError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let layout = Layout::from_headers(csv_reader.headers()?)?;

    let mut cases = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Header is line 1.
        cases.push(layout.case_from_record(&record, index + 2)?);
    }
    Ok(cases)
}

impl Layout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, CaseStoreError> {
        let find = |name: &'static str| -> Option<usize> {
            headers.iter().position(|header| header == name)
        };
        let require =
            |name: &'static str| find(name).ok_or(CaseStoreError::MissingColumn(name));

        let id = find("refugee_id")
            .or_else(|| find("id"))
            .ok_or(CaseStoreError::MissingColumn("refugee_id"))?;

        let profile_string = find("profile_string");
        let mut attributes = [AttributeSource::Column(0); 5];
        for (slot, &(column, _)) in ATTRIBUTES.iter().enumerate() {
            attributes[slot] = match (find(column), profile_string) {
                (Some(position), _) => AttributeSource::Column(position),
                (None, Some(position)) => AttributeSource::ProfileString(position),
                (None, None) => return Err(CaseStoreError::MissingColumn(column)),
            };
        }

        let mut countries: Vec<CountryColumns> = Vec::new();
        for (position, header) in headers.iter().enumerate() {
            let Some((slot, key)) = DIMENSION_SUFFIXES
                .iter()
                .enumerate()
                .find_map(|(slot, suffix)| header.strip_suffix(suffix).map(|key| (slot, key)))
            else {
                continue;
            };
            if key.is_empty() {
                continue;
            }

            let name = country_name(key);
            match countries.iter_mut().find(|columns| columns.name == name) {
                Some(columns) => columns.positions[slot] = Some(position),
                None => {
                    let mut positions = [None; 4];
                    positions[slot] = Some(position);
                    countries.push(CountryColumns { name, positions });
                }
            }
        }

        Ok(Self {
            id,
            attributes,
            recommended_country: require("recommended_country")?,
            countries,
        })
    }

    fn case_from_record(
        &self,
        record: &csv::StringRecord,
        row: usize,
    ) -> Result<Case, CaseStoreError> {
        let field = |position: usize| record.get(position).unwrap_or("").to_string();

        let features = self.attributes.iter().find_map(|source| match source {
            AttributeSource::ProfileString(position) => {
                Some(profile_features(record.get(*position).unwrap_or("")))
            }
            AttributeSource::Column(_) => None,
        });
        let [age_group, gender, origin, education, english]: [String; 5] =
            std::array::from_fn(|slot| match self.attributes[slot] {
                AttributeSource::Column(position) => field(position),
                AttributeSource::ProfileString(_) => {
                    let (column, feature) = ATTRIBUTES[slot];
                    let value = features
                        .as_ref()
                        .and_then(|features| {
                            features
                                .iter()
                                .find(|(name, _)| *name == feature)
                                .map(|(_, value)| *value)
                        })
                        .unwrap_or("");
                    if column == "age_group" {
                        age_bracket(value)
                    } else {
                        value.to_string()
                    }
                }
            });

        let mut scores = CountryScores::new();
        for columns in &self.countries {
            let cells: Vec<(String, &str)> = DIMENSION_SUFFIXES
                .iter()
                .zip(columns.positions)
                .map(|(suffix, position)| {
                    let column = format!("{}{}", country_key(&columns.name), suffix);
                    let value = position.and_then(|pos| record.get(pos)).unwrap_or("");
                    (column, value)
                })
                .collect();

            if cells.iter().all(|(_, value)| value.is_empty()) {
                continue;
            }

            let mut values = [0.0_f64; 4];
            for (slot, (column, value)) in cells.into_iter().enumerate() {
                values[slot] = value.parse().map_err(|_| CaseStoreError::InvalidNumber {
                    row,
                    column,
                    value: value.to_string(),
                })?;
            }

            let [emotional, cultural, ethical, weighted] = values;
            scores.insert(
                columns.name.clone(),
                ScoreBundle {
                    emotional,
                    cultural,
                    ethical,
                    weighted,
                },
            );
        }

        Ok(Case {
            id: field(self.id),
            age_group,
            gender,
            origin,
            education,
            english,
            scores,
            recommended_country: field(self.recommended_country),
        })
    }
}

fn profile_features(raw: &str) -> Vec<(&str, &str)> {
    raw.split(';')
        .filter_map(|part| part.split_once(':'))
        .map(|(name, value)| (name.trim(), value.trim()))
        .collect()
}

/// Numeric ages fall into the dataset's brackets; anything else passes through.
fn age_bracket(value: &str) -> String {
    let Ok(age) = value.parse::<f64>() else {
        return value.to_string();
    };
    let bracket = if age < 26.0 {
        "18-25"
    } else if age < 36.0 {
        "26-35"
    } else if age < 46.0 {
        "36-45"
    } else {
        "46+"
    };
    bracket.to_string()
}

fn country_key(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

fn country_name(key: &str) -> String {
    if let Some((_, name)) = KNOWN_HOSTS.iter().find(|(known, _)| *known == key) {
        return (*name).to_string();
    }

    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = "\
refugee_id,profile_string,age_group,gender,origin,education,english,recommended_country,recommendation_score,united_states_emotional,united_states_cultural,united_states_ethical,united_states_weighted,new_zealand_emotional,new_zealand_cultural,new_zealand_ethical,new_zealand_weighted,emotional_reasoning
a1,Age: 24,18-25,Male,South Sudan,Secondary,Yes,New Zealand,7.9,6,7,8,7.0,8,8,7.5,7.9,stable
b2,Age: 51,46+,Female,Somalia,None,No,United States,6.1,6,6,6.5,6.1,,,,,uncertain
";

    #[test]
    fn parses_country_columns_in_header_order() {
        let cases = parse_cases(RESULTS.as_bytes()).expect("results parse");
        assert_eq!(cases.len(), 2);

        let first = &cases[0];
        assert_eq!(first.id, "a1");
        assert_eq!(first.origin, "South Sudan");
        let countries: Vec<&str> = first.scores.keys().map(String::as_str).collect();
        assert_eq!(countries, vec!["United States", "New Zealand"]);
        assert_eq!(first.scores["New Zealand"].weighted, 7.9);
        assert_eq!(first.recommended_country, "New Zealand");
    }

    #[test]
    fn skips_countries_with_no_cells() {
        let cases = parse_cases(RESULTS.as_bytes()).expect("results parse");
        let second = &cases[1];
        assert_eq!(second.scores.len(), 1);
        assert!(second.scores.contains_key("United States"));
    }

    #[test]
    fn rejects_non_numeric_cells() {
        let csv = "\
id,age_group,gender,origin,education,english,recommended_country,canada_emotional,canada_cultural,canada_ethical,canada_weighted
c1,26-35,Male,Syria,University,Yes,Canada,high,7,7,7
";
        let err = parse_cases(csv.as_bytes()).expect_err("non-numeric cell rejected");
        match err {
            CaseStoreError::InvalidNumber { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "canada_emotional");
                assert_eq!(value, "high");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn requires_profile_columns() {
        let csv = "id,age_group,gender,origin,education,english\nc1,26-35,Male,Syria,University,Yes\n";
        let err = parse_cases(csv.as_bytes()).expect_err("recommended_country required");
        assert!(matches!(
            err,
            CaseStoreError::MissingColumn("recommended_country")
        ));
    }

    #[test]
    fn reads_attributes_from_profile_string_export() {
        let csv = "\
refugee_id,profile_string,total_features,recommended_country,recommendation_score,canada_emotional,canada_cultural,canada_ethical,canada_weighted
r7,Age: 38; Gender: Female; Country Of Origin: DR Congo; Household Size: 5; Education Level: Primary; Speaks English: No,6,Canada,6.4,6.5,6.2,6.6,6.4
r8,Age: 19; Gender: Male; Country Of Origin: Somalia,3,Canada,5.9,6,5.8,6,5.9
";
        let cases = parse_cases(csv.as_bytes()).expect("export parses");

        let first = &cases[0];
        assert_eq!(first.age_group, "36-45");
        assert_eq!(first.gender, "Female");
        assert_eq!(first.origin, "DR Congo");
        assert_eq!(first.education, "Primary");
        assert_eq!(first.english, "No");
        assert_eq!(first.scores["Canada"].weighted, 6.4);

        let second = &cases[1];
        assert_eq!(second.age_group, "18-25");
        assert_eq!(second.education, "");
        assert_eq!(second.english, "");
    }

    #[test]
    fn attribute_without_column_or_profile_string_is_missing() {
        let csv = "id,gender,origin,education,english,recommended_country\nc1,Male,Syria,University,Yes,Canada\n";
        let err = parse_cases(csv.as_bytes()).expect_err("age_group required");
        assert!(matches!(err, CaseStoreError::MissingColumn("age_group")));
    }

    #[test]
    fn buckets_numeric_ages() {
        assert_eq!(age_bracket("24"), "18-25");
        assert_eq!(age_bracket("30.0"), "26-35");
        assert_eq!(age_bracket("45"), "36-45");
        assert_eq!(age_bracket("60"), "46+");
        assert_eq!(age_bracket("26-35"), "26-35");
    }

    #[test]
    fn title_cases_unknown_country_keys() {
        assert_eq!(country_name("united_states"), "United States");
        assert_eq!(country_name("new_zealand"), "New Zealand");
        assert_eq!(country_key("New Zealand"), "new_zealand");
    }
}
