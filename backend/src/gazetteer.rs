use std::{fs::File, io::Read, path::Path};

use shared::{Candidate, SearchHit};

use crate::error::ServiceError;

/// In-memory list of named places searched by `/search`.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    places: Vec<SearchHit>,
    /// Lowercased `city` of each place, same order as `places`.
    folded: Vec<String>,
}

impl Gazetteer {
    pub fn new(places: Vec<SearchHit>) -> Result<Self, ServiceError> {
        if places.is_empty() {
            return Err(ServiceError::EmptyGazetteer);
        }
        for (index, place) in places.iter().enumerate() {
            Candidate::try_from(place.clone())
                .map_err(|reason| ServiceError::InvalidPlace { index, reason })?;
        }
        let folded = places.iter().map(|p| p.city.to_lowercase()).collect();
        Ok(Self { places, folded })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ServiceError> {
        let places: Vec<SearchHit> = serde_json::from_reader(reader)?;
        Self::new(places)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Case-insensitive lookup: prefix matches first, then substring matches,
    /// each in gazetteer order.
    pub fn search(&self, text: &str, limit: usize) -> Vec<SearchHit> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let prefix = self
            .folded
            .iter()
            .enumerate()
            .filter(|(_, name)| name.starts_with(&needle));
        let substring = self
            .folded
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.starts_with(&needle) && name.contains(&needle));
        prefix
            .chain(substring)
            .take(limit)
            .map(|(idx, _)| self.places[idx].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn place(city: &str, lat: f64, lng: f64) -> SearchHit {
        SearchHit {
            city: city.into(),
            lat,
            lng,
        }
    }

    fn sample() -> Gazetteer {
        Gazetteer::new(vec![
            place("New Delhi", 28.6129, 77.2295),
            place("Noida", 28.5355, 77.3910),
            place("Delhi", 28.6139, 77.2090),
            place("Greater Noida", 28.4744, 77.5040),
        ])
        .unwrap()
    }

    fn names(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|h| h.city.as_str()).collect()
    }

    #[test]
    fn prefix_matches_rank_first() {
        let gazetteer = sample();
        assert_eq!(names(&gazetteer.search("del", 10)), vec!["Delhi", "New Delhi"]);
        assert_eq!(
            names(&gazetteer.search("  NOIDA ", 10)),
            vec!["Noida", "Greater Noida"]
        );
    }

    #[test]
    fn blank_query_and_limit() {
        let gazetteer = sample();
        assert!(gazetteer.search("   ", 10).is_empty());
        assert_eq!(gazetteer.search("a", 2).len(), 2);
        assert!(gazetteer.search("zz", 10).is_empty());
    }

    #[test]
    fn rejects_empty_and_invalid_places() {
        assert!(matches!(
            Gazetteer::new(Vec::new()),
            Err(ServiceError::EmptyGazetteer)
        ));
        assert!(matches!(
            Gazetteer::new(vec![place("Ok", 1.0, 1.0), place("Bad", 0.0, 200.0)]),
            Err(ServiceError::InvalidPlace { index: 1, .. })
        ));
        assert!(matches!(
            Gazetteer::from_reader("{\"city\": 1}".as_bytes()),
            Err(ServiceError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"city": "Agra", "lat": 27.1767, "lng": 78.0081}}]"#).unwrap();
        let gazetteer = Gazetteer::from_file(file.path()).unwrap();
        assert_eq!(gazetteer.len(), 1);
        assert_eq!(names(&gazetteer.search("agr", 10)), vec!["Agra"]);

        assert!(matches!(
            Gazetteer::from_file(file.path().with_extension("missing")),
            Err(ServiceError::Io(_))
        ));
    }
}
