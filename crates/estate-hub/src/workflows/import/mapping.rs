use super::domain::{
    CanonicalProperty, PropertyStatus, PropertyType, RawRow, MAX_DESCRIPTION_CHARS,
    MAX_LOCATION_CHARS, MAX_TITLE_CHARS, PLACEHOLDER_IMAGE,
};
use super::normalizer::{
    capitalize, normalize_header, parse_count, parse_currency, parse_measure, split_list,
    truncate_chars, DEFAULT_BATHROOMS, DEFAULT_BEDROOMS, DEFAULT_PARKING,
};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::OnceLock;

/// Source columns the mapper understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Column {
    PropertyName,
    BuildingName,
    Street,
    Suburb,
    UnitPrice,
    InternalArea,
    Bedrooms,
    Bathrooms,
    Parking,
    Study,
    Aspect,
    InvestmentStrategy,
    Image,
}

static COLUMN_ALIASES: OnceLock<HashMap<String, Column>> = OnceLock::new();

pub(crate) fn column_for_header(header: &str) -> Option<Column> {
    column_aliases().get(&normalize_header(header)).copied()
}

fn column_aliases() -> &'static HashMap<String, Column> {
    COLUMN_ALIASES.get_or_init(|| {
        const HEADER_TO_COLUMN: &[(&str, Column)] = &[
            ("Property Name", Column::PropertyName),
            ("Property", Column::PropertyName),
            ("Listing Name", Column::PropertyName),
            ("Title", Column::PropertyName),
            ("Building Name", Column::BuildingName),
            ("Building", Column::BuildingName),
            ("Project", Column::BuildingName),
            ("Project Name", Column::BuildingName),
            ("Development", Column::BuildingName),
            ("Street", Column::Street),
            ("Street Address", Column::Street),
            ("Address", Column::Street),
            ("Suburb", Column::Suburb),
            ("City", Column::Suburb),
            ("Location", Column::Suburb),
            ("Unit Price", Column::UnitPrice),
            ("Price", Column::UnitPrice),
            ("List Price", Column::UnitPrice),
            ("Internal Area", Column::InternalArea),
            ("Internal Area (sqm)", Column::InternalArea),
            ("Area", Column::InternalArea),
            ("Size", Column::InternalArea),
            ("Bedroom", Column::Bedrooms),
            ("Bedrooms", Column::Bedrooms),
            ("Beds", Column::Bedrooms),
            ("Bathroom", Column::Bathrooms),
            ("Bathrooms", Column::Bathrooms),
            ("Baths", Column::Bathrooms),
            ("Parking", Column::Parking),
            ("Car Park", Column::Parking),
            ("Car Parks", Column::Parking),
            ("Car Spaces", Column::Parking),
            ("Study", Column::Study),
            ("Aspect", Column::Aspect),
            ("Orientation", Column::Aspect),
            ("Investment Strategy", Column::InvestmentStrategy),
            ("Strategy", Column::InvestmentStrategy),
            ("Image", Column::Image),
            ("Image URL", Column::Image),
            ("Photo", Column::Image),
        ];

        let mut map = HashMap::with_capacity(HEADER_TO_COLUMN.len());
        for (header, column) in HEADER_TO_COLUMN {
            map.insert(normalize_header(header), *column);
        }
        map
    })
}

/// Header-keyed view over a raw row. The first non-empty cell wins when two
/// headers alias the same column.
struct ResolvedRow<'a> {
    cells: HashMap<Column, &'a str>,
}

impl<'a> ResolvedRow<'a> {
    fn new(row: &'a RawRow) -> Self {
        let mut cells = HashMap::new();
        for (header, value) in row.cells() {
            if value.is_empty() {
                continue;
            }
            if let Some(column) = column_for_header(header) {
                cells.entry(column).or_insert(value);
            }
        }
        Self { cells }
    }

    fn get(&self, column: Column) -> Option<&'a str> {
        self.cells.get(&column).copied()
    }

    fn text(&self, column: Column) -> &'a str {
        self.get(column).unwrap_or("")
    }
}

/// Rows without both a price and an area cell never reach the mapper.
pub(crate) fn has_required_cells(row: &RawRow) -> bool {
    let resolved = ResolvedRow::new(row);
    resolved.get(Column::UnitPrice).is_some() && resolved.get(Column::InternalArea).is_some()
}

/// Maps one row to a listing; `None` when the result cannot be written
/// (price or area not positive).
pub(crate) fn map_row(row: &RawRow) -> Option<CanonicalProperty> {
    let cells = ResolvedRow::new(row);

    let price = parse_currency(cells.text(Column::UnitPrice));
    let area = parse_measure(cells.text(Column::InternalArea));
    let bedrooms = parse_count(cells.get(Column::Bedrooms), DEFAULT_BEDROOMS);
    let bathrooms = parse_count(cells.get(Column::Bathrooms), DEFAULT_BATHROOMS);
    let parking = parse_count(cells.get(Column::Parking), DEFAULT_PARKING);
    let property_type = PropertyType::infer_from_bedrooms(bedrooms);

    let building = cells.text(Column::BuildingName);
    let street = cells.text(Column::Street);

    let title = match cells.get(Column::PropertyName) {
        Some(name) => name.to_string(),
        None => synthesize_title(bedrooms, property_type, building),
    };

    let property = CanonicalProperty {
        title: truncate_chars(&title, MAX_TITLE_CHARS),
        property_type,
        status: PropertyStatus::Available,
        price,
        location: truncate_chars(
            &build_location(street, cells.text(Column::Suburb), building),
            MAX_LOCATION_CHARS,
        ),
        bedrooms,
        bathrooms,
        area,
        image: cells
            .get(Column::Image)
            .unwrap_or(PLACEHOLDER_IMAGE)
            .to_string(),
        description: truncate_chars(
            &build_description(property_type, building, street, bedrooms, bathrooms, area),
            MAX_DESCRIPTION_CHARS,
        ),
        features: build_features(
            cells.text(Column::InvestmentStrategy),
            parking,
            cells.text(Column::Study),
            cells.text(Column::Aspect),
        ),
    };

    property.is_writable().then_some(property)
}

fn synthesize_title(bedrooms: u32, property_type: PropertyType, building: &str) -> String {
    let mut title = format!("{bedrooms} Bed {}", capitalize(property_type.as_str()));
    if !building.is_empty() {
        let _ = write!(title, " - {building}");
    }
    title
}

fn build_location(street: &str, suburb: &str, building: &str) -> String {
    let parts: Vec<&str> = [street, suburb]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        building.to_string()
    } else {
        parts.join(", ")
    }
}

fn build_description(
    property_type: PropertyType,
    building: &str,
    street: &str,
    bedrooms: u32,
    bathrooms: u32,
    area: f64,
) -> String {
    let mut description = property_type.label().to_string();
    if !building.is_empty() {
        let _ = write!(description, " in {building}");
    }
    if !street.is_empty() {
        let _ = write!(description, " at {street}");
    }
    let _ = write!(
        description,
        ". Features {} and {} with {} sqm of internal area.",
        pluralize(bedrooms, "bedroom"),
        pluralize(bathrooms, "bathroom"),
        format_area(area)
    );
    description
}

fn build_features(strategy: &str, parking: u32, study: &str, aspect: &str) -> Vec<String> {
    let mut features = split_list(strategy);

    if parking > 0 {
        let noun = if parking == 1 { "Car Park" } else { "Car Parks" };
        features.push(format!("{parking} {noun}"));
    }

    if !study.is_empty() {
        features.push("Study".to_string());
    }

    let aspects = split_list(aspect);
    if !aspects.is_empty() {
        features.push(format!("{} Aspect", aspects.join(", ")));
    }

    features
}

fn pluralize(count: u32, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn format_area(area: f64) -> String {
    if area.fract() == 0.0 {
        format!("{area:.0}")
    } else {
        format!("{area}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        let headers: Vec<&str> = pairs.iter().map(|(header, _)| *header).collect();
        let values: Vec<&str> = pairs.iter().map(|(_, value)| *value).collect();
        RawRow::from_cells(&headers, &values)
    }

    #[test]
    fn aliases_resolve_to_columns() {
        assert_eq!(column_for_header("Unit Price"), Some(Column::UnitPrice));
        assert_eq!(column_for_header("  BEDROOMS "), Some(Column::Bedrooms));
        assert_eq!(column_for_header("Car Spaces"), Some(Column::Parking));
        assert_eq!(column_for_header("Floor"), None);
    }

    #[test]
    fn maps_listing_sheet_row() {
        let property = map_row(&row(&[
            ("Building Name", "Aurora"),
            ("Street", "12 Queen St"),
            ("Suburb", "Melbourne"),
            ("Unit Price", "$ 819,990.00"),
            ("Internal Area", "89"),
            ("Bedroom", "2"),
            ("Bathroom", "1"),
        ]))
        .expect("row is writable");

        assert_eq!(property.price, 819_990.0);
        assert_eq!(property.area, 89.0);
        assert_eq!(property.bedrooms, 2);
        assert_eq!(property.bathrooms, 1);
        assert_eq!(property.property_type, PropertyType::Apartment);
        assert_eq!(property.status, PropertyStatus::Available);
        assert_eq!(property.title, "2 Bed Apartment - Aurora");
        assert_eq!(property.location, "12 Queen St, Melbourne");
        assert_eq!(property.image, PLACEHOLDER_IMAGE);
        assert_eq!(
            property.description,
            "Apartment in Aurora at 12 Queen St. Features 2 bedrooms and 1 bathroom with 89 sqm of internal area."
        );
    }

    #[test]
    fn explicit_property_name_wins_over_synthesized_title() {
        let property = map_row(&row(&[
            ("Property Name", "Sky Residence 4501"),
            ("Building Name", "Aurora"),
            ("Unit Price", "2,400,000"),
            ("Internal Area", "210"),
            ("Bedroom", "5"),
        ]))
        .expect("row is writable");

        assert_eq!(property.title, "Sky Residence 4501");
        assert_eq!(property.property_type, PropertyType::Penthouse);
    }

    #[test]
    fn features_follow_fixed_order() {
        let property = map_row(&row(&[
            ("Unit Price", "650000"),
            ("Internal Area", "72"),
            ("Investment Strategy", "Capital Growth; Rental Yield"),
            ("Parking", "2"),
            ("Study", "Yes"),
            ("Aspect", "North; East"),
        ]))
        .expect("row is writable");

        assert_eq!(
            property.features,
            vec![
                "Capital Growth".to_string(),
                "Rental Yield".to_string(),
                "2 Car Parks".to_string(),
                "Study".to_string(),
                "North, East Aspect".to_string(),
            ]
        );
    }

    #[test]
    fn single_counts_are_not_pluralized() {
        let property = map_row(&row(&[
            ("Unit Price", "450000"),
            ("Internal Area", "48.5"),
            ("Bedroom", "1"),
            ("Bathroom", "2"),
            ("Parking", "1"),
        ]))
        .expect("row is writable");

        assert!(property
            .description
            .ends_with("Features 1 bedroom and 2 bathrooms with 48.5 sqm of internal area."));
        assert_eq!(property.features, vec!["1 Car Park".to_string()]);
    }

    #[test]
    fn long_titles_are_truncated() {
        let long_name = "x".repeat(260);
        let property = map_row(&row(&[
            ("Property Name", long_name.as_str()),
            ("Unit Price", "500000"),
            ("Internal Area", "60"),
        ]))
        .expect("row is writable");

        assert_eq!(property.title.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn non_positive_price_or_area_is_rejected() {
        assert!(map_row(&row(&[("Unit Price", "N/A"), ("Internal Area", "80")])).is_none());
        assert!(map_row(&row(&[("Unit Price", "500000"), ("Internal Area", "0")])).is_none());
    }

    #[test]
    fn required_cells_check_needs_price_and_area() {
        assert!(has_required_cells(&row(&[
            ("Price", "1"),
            ("Area", "1")
        ])));
        assert!(!has_required_cells(&row(&[
            ("Unit Price", ""),
            ("Internal Area", "80")
        ])));
        assert!(!has_required_cells(&row(&[("Unit Price", "500000")])));
    }

    #[test]
    fn location_falls_back_to_building() {
        let property = map_row(&row(&[
            ("Building Name", "Harbour One"),
            ("Unit Price", "990000"),
            ("Internal Area", "101"),
        ]))
        .expect("row is writable");

        assert_eq!(property.location, "Harbour One");
        assert_eq!(property.bathrooms, 1);
    }

    #[test]
    fn annotated_price_and_count_cells_keep_their_leading_value() {
        let property = map_row(&row(&[
            ("Building Name", "Aurora"),
            ("Unit Price", "$ 650,000 (2 units)"),
            ("Internal Area", "72 sqm"),
            ("Bedroom", "2 Bed"),
            ("Bathroom", "2+1"),
        ]))
        .expect("row is writable");

        assert_eq!(property.price, 650_000.0);
        assert_eq!(property.bedrooms, 2);
        assert_eq!(property.bathrooms, 2);
        assert_eq!(property.title, "2 Bed Apartment - Aurora");
    }
}
