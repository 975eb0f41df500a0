// Parameter catalog - measurable quantities shown on the maps
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterCategory {
    Physical,
    Biological,
    Geological,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterIcon {
    Thermometer,
    Activity,
    Waves,
    Eye,
}

impl ParameterIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            ParameterIcon::Thermometer => "🌡",
            ParameterIcon::Activity => "〰",
            ParameterIcon::Waves => "🌊",
            ParameterIcon::Eye => "◉",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub id: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    pub color: &'static str,
    pub icon: ParameterIcon,
    pub category: ParameterCategory,
}

pub const DEFAULT_PARAMETER: &str = "sst";

const CATALOG: [Parameter; 4] = [
    Parameter {
        id: "sst",
        name: "Sea Surface Temperature",
        unit: "°C",
        color: "#ef4444",
        icon: ParameterIcon::Thermometer,
        category: ParameterCategory::Physical,
    },
    Parameter {
        id: "chlorophyll",
        name: "Chlorophyll-a Concentration",
        unit: "mg/m³",
        color: "#22c55e",
        icon: ParameterIcon::Activity,
        category: ParameterCategory::Biological,
    },
    Parameter {
        id: "salinity",
        name: "Sea Surface Salinity",
        unit: "PSU",
        color: "#3b82f6",
        icon: ParameterIcon::Waves,
        category: ParameterCategory::Physical,
    },
    Parameter {
        id: "bathymetry",
        name: "Bathymetry",
        unit: "m",
        color: "#8b5cf6",
        icon: ParameterIcon::Eye,
        category: ParameterCategory::Geological,
    },
];

/// All parameters, in display order
pub fn catalog() -> &'static [Parameter] {
    &CATALOG
}

pub fn find(id: &str) -> Option<&'static Parameter> {
    CATALOG.iter().find(|p| p.id == id)
}

/// Case-insensitive name search combined with an optional category.
/// An empty search matches every name; `None` matches every category.
pub fn filter(search: &str, category: Option<ParameterCategory>) -> Vec<&'static Parameter> {
    let needle = search.to_lowercase();
    CATALOG
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .filter(|p| category.is_none_or(|c| p.category == c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find() {
        assert_eq!(find("salinity").map(|p| p.unit), Some("PSU"));
        assert!(find("turbidity").is_none());
        assert!(find(DEFAULT_PARAMETER).is_some());
    }

    fn ids(parameters: Vec<&Parameter>) -> Vec<&str> {
        parameters.into_iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_filter_by_category() {
        assert_eq!(ids(filter("", Some(ParameterCategory::Physical))), vec!["sst", "salinity"]);
        assert_eq!(ids(filter("", Some(ParameterCategory::Biological))), vec!["chlorophyll"]);
        assert_eq!(ids(filter("", Some(ParameterCategory::Geological))), vec!["bathymetry"]);
        assert_eq!(filter("", None).len(), catalog().len());
    }

    #[test]
    fn test_filter_by_name_ignores_case() {
        assert_eq!(ids(filter("SEA SURFACE", None)), vec!["sst", "salinity"]);
        assert_eq!(ids(filter("surface", Some(ParameterCategory::Physical))), vec!["sst", "salinity"]);
        assert_eq!(ids(filter("temp", None)), vec!["sst"]);
        assert!(filter("temp", Some(ParameterCategory::Geological)).is_empty());
        assert!(filter("turbidity", None).is_empty());
    }
}
