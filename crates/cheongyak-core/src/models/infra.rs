//! Nearby infrastructure (schools and stations) for a listing.

use serde::{Deserialize, Serialize};

use super::de::{deserialize_decimal, deserialize_string_or_number};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Infra {
    #[serde(default)]
    pub schools: Vec<School>,
    #[serde(default)]
    pub stations: Vec<Station>,
}

/// Whether a school is publicly or privately run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchoolOwnership {
    Public,
    Private,
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct School {
    #[serde(rename = "schoolName", default)]
    pub name: Option<String>,
    /// Ownership as reported by the API (`공립`, `사립`, ...).
    #[serde(rename = "type", default)]
    pub school_type: Option<String>,
    /// Distance from the complex in metres.
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub distance: Option<String>,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub longitude: Option<f64>,
}

impl School {
    pub fn ownership(&self) -> SchoolOwnership {
        match self.school_type.as_deref().map(str::trim) {
            Some("공립") => SchoolOwnership::Public,
            Some("사립") => SchoolOwnership::Private,
            _ => SchoolOwnership::Other,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Station {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub line: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub distance: Option<String>,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub longitude: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_infra() {
        let json = r#"{
            "schools": [
                {"schoolName": "반포초등학교", "type": "공립", "distance": 320, "latitude": "37.50", "longitude": "127.00"},
                {"schoolName": "계성초등학교", "type": "사립", "distance": "810"}
            ],
            "stations": [
                {"name": "신반포", "line": "9호선", "distance": 450.5}
            ]
        }"#;

        let infra: Infra = serde_json::from_str(json).expect("Failed to parse infra test JSON");
        assert_eq!(infra.schools.len(), 2);
        assert_eq!(infra.schools[0].ownership(), SchoolOwnership::Public);
        assert_eq!(infra.schools[1].ownership(), SchoolOwnership::Private);
        assert_eq!(infra.schools[0].distance.as_deref(), Some("320"));
        assert_eq!(infra.schools[0].latitude, Some(37.5));
        assert!(infra.schools[1].longitude.is_none());
        assert_eq!(infra.stations[0].distance.as_deref(), Some("450.5"));
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let infra: Infra = serde_json::from_str(r#"{"schools": []}"#).unwrap();
        assert!(infra.schools.is_empty());
        assert!(infra.stations.is_empty());
    }

    #[test]
    fn test_unknown_school_type() {
        let school = School {
            school_type: Some("국립".to_string()),
            ..Default::default()
        };
        assert_eq!(school.ownership(), SchoolOwnership::Other);
        assert_eq!(School::default().ownership(), SchoolOwnership::Other);
    }
}
