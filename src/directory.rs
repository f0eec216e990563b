use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::Museum;

/// The museum directory. The venue list ships as a JSON document embedded in
/// the page; filtering happens entirely client-side.
pub struct MuseumDirectory {
    museums: Vec<Museum>,
}

impl MuseumDirectory {
    pub fn from_json(document: &str) -> Result<Self> {
        let museums: Vec<Museum> = serde_json::from_str(document)?;
        Ok(Self { museums })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let document = fs::read_to_string(path)?;
        Self::from_json(&document)
    }

    pub fn all(&self) -> &[Museum] {
        &self.museums
    }

    /// Venues whose city matches exactly. Cities are standardized to their
    /// full names upstream, so no normalization happens here.
    pub fn filter_by_city(&self, city: &str) -> Vec<&Museum> {
        self.museums
            .iter()
            .filter(|museum| museum.city.as_deref() == Some(city))
            .collect()
    }

    /// Distinct city names for the filter control, in first-seen order.
    pub fn cities(&self) -> Vec<&str> {
        let mut cities: Vec<&str> = Vec::new();
        for museum in &self.museums {
            if let Some(city) = museum.city.as_deref() {
                if !cities.contains(&city) {
                    cities.push(city);
                }
            }
        }
        cities
    }
}

/// Clickable website URL for a venue, if it has a usable one. Bare hostnames
/// get an `http://` scheme; placeholder values are treated as absent.
pub fn website_link(museum: &Museum) -> Option<String> {
    let website = museum.website.as_deref()?.trim();
    if website.is_empty() || website.eq_ignore_ascii_case("n/a") {
        return None;
    }
    if website.starts_with("http://") || website.starts_with("https://") {
        Some(website.to_string())
    } else {
        Some(format!("http://{website}"))
    }
}

/// Detail lines for a venue, in the order the detail modal shows them.
pub fn detail_lines(museum: &Museum) -> Vec<String> {
    const UNKNOWN: &str = "no information";
    let field = |value: &Option<String>| -> String {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string()
    };

    let mut lines = vec![
        format!("Address: {}", museum.address),
        format!("Type: {}", field(&museum.kind)),
        format!("Opened: {}", field(&museum.opening_date)),
        format!("Hours: {}", field(&museum.operating_hours)),
        format!("Phone: {}", field(&museum.phone)),
    ];
    if let Some(link) = website_link(museum) {
        lines.push(format!("Website: {link}"));
    }
    lines
}
