//! Static category catalog: regions with their acceptable country names,
//! plus the genre, decade and budget enumerations the spinner draws from.

use rand::Rng;

use crate::error::{AppError, AppResult};

use super::CategorySelections;

pub const REGIONS: &[&str] = &[
    "North America",
    "Europe",
    "Asia",
    "Latin America",
    "Africa",
    "Oceania",
];

const NORTH_AMERICA: &[&str] = &[
    "United States",
    "USA",
    "Canada",
    "Mexico",
    "Greenland",
    "Bermuda",
    "Saint Pierre and Miquelon",
];

const EUROPE: &[&str] = &[
    "Albania",
    "Andorra",
    "Armenia",
    "Austria",
    "Azerbaijan",
    "Belarus",
    "Belgium",
    "Bosnia and Herzegovina",
    "Bulgaria",
    "Croatia",
    "Cyprus",
    "Czech Republic",
    "Denmark",
    "Estonia",
    "Finland",
    "France",
    "Georgia",
    "Germany",
    "Greece",
    "Hungary",
    "Iceland",
    "Ireland",
    "Italy",
    "Kazakhstan",
    "Kosovo",
    "Latvia",
    "Liechtenstein",
    "Lithuania",
    "Luxembourg",
    "Malta",
    "Moldova",
    "Monaco",
    "Montenegro",
    "Netherlands",
    "North Macedonia",
    "Norway",
    "Poland",
    "Portugal",
    "Romania",
    "Russia",
    "San Marino",
    "Serbia",
    "Slovakia",
    "Slovenia",
    "Spain",
    "Sweden",
    "Switzerland",
    "Turkey",
    "Ukraine",
    "United Kingdom",
    "UK",
    "Vatican City",
];

const ASIA: &[&str] = &[
    "Afghanistan",
    "Armenia",
    "Azerbaijan",
    "Bahrain",
    "Bangladesh",
    "Bhutan",
    "Brunei",
    "Cambodia",
    "China",
    "Cyprus",
    "East Timor",
    "Timor-Leste",
    "Georgia",
    "India",
    "Indonesia",
    "Iran",
    "Iraq",
    "Israel",
    "Japan",
    "Jordan",
    "Kazakhstan",
    "Kuwait",
    "Kyrgyzstan",
    "Laos",
    "Lebanon",
    "Malaysia",
    "Maldives",
    "Mongolia",
    "Myanmar",
    "Burma",
    "Nepal",
    "North Korea",
    "Oman",
    "Pakistan",
    "Palestine",
    "Philippines",
    "Qatar",
    "Russia",
    "Saudi Arabia",
    "Singapore",
    "South Korea",
    "Sri Lanka",
    "Syria",
    "Taiwan",
    "Tajikistan",
    "Thailand",
    "Turkey",
    "Turkmenistan",
    "United Arab Emirates",
    "Uzbekistan",
    "Vietnam",
    "Yemen",
];

const LATIN_AMERICA: &[&str] = &[
    "Mexico",
    "Belize",
    "Costa Rica",
    "El Salvador",
    "Guatemala",
    "Honduras",
    "Nicaragua",
    "Panama",
    "Cuba",
    "Dominican Republic",
    "Haiti",
    "Jamaica",
    "Puerto Rico",
    "Argentina",
    "Bolivia",
    "Brazil",
    "Chile",
    "Colombia",
    "Ecuador",
    "Guyana",
    "Paraguay",
    "Peru",
    "Suriname",
    "Uruguay",
    "Venezuela",
    "Trinidad and Tobago",
    "Barbados",
    "Bahamas",
    "Grenada",
    "St. Lucia",
    "Antigua and Barbuda",
    "St. Kitts and Nevis",
    "Dominica",
    "St. Vincent and the Grenadines",
];

const AFRICA: &[&str] = &[
    "Algeria",
    "Angola",
    "Benin",
    "Botswana",
    "Burkina Faso",
    "Burundi",
    "Cabo Verde",
    "Cameroon",
    "Central African Republic",
    "Chad",
    "Comoros",
    "Democratic Republic of the Congo",
    "Republic of the Congo",
    "Djibouti",
    "Egypt",
    "Equatorial Guinea",
    "Eritrea",
    "Eswatini",
    "Ethiopia",
    "Gabon",
    "Gambia",
    "Ghana",
    "Guinea",
    "Guinea-Bissau",
    "Ivory Coast",
    "Kenya",
    "Lesotho",
    "Liberia",
    "Libya",
    "Madagascar",
    "Malawi",
    "Mali",
    "Mauritania",
    "Mauritius",
    "Morocco",
    "Mozambique",
    "Namibia",
    "Niger",
    "Nigeria",
    "Rwanda",
    "Sao Tome and Principe",
    "Senegal",
    "Seychelles",
    "Sierra Leone",
    "Somalia",
    "South Africa",
    "South Sudan",
    "Sudan",
    "Tanzania",
    "Togo",
    "Tunisia",
    "Uganda",
    "Zambia",
    "Zimbabwe",
];

const OCEANIA: &[&str] = &[
    "Australia",
    "New Zealand",
    "Fiji",
    "Papua New Guinea",
    "Samoa",
    "Solomon Islands",
    "Tonga",
    "Vanuatu",
    "Micronesia",
    "Palau",
    "Marshall Islands",
    "Kiribati",
    "Nauru",
    "Tuvalu",
];

pub const GENRES: &[&str] = &[
    "Drama",
    "Comedy",
    "Horror",
    "Action",
    "Sci-Fi",
    "Romance",
    "Thriller",
    "Animation",
    "Documentary",
];

pub const DECADES: &[&str] = &[
    "1950s", "1960s", "1970s", "1980s", "1990s", "2000s", "2010s", "2020s",
];

pub const BUDGETS: &[&str] = &["Micro-budget", "Indie", "Studio", "Blockbuster"];

/// Country names accepted for a region
pub fn region_countries(region: &str) -> Option<&'static [&'static str]> {
    match region {
        "North America" => Some(NORTH_AMERICA),
        "Europe" => Some(EUROPE),
        "Asia" => Some(ASIA),
        "Latin America" => Some(LATIN_AMERICA),
        "Africa" => Some(AFRICA),
        "Oceania" => Some(OCEANIA),
        _ => None,
    }
}

/// Dollar range shown to the model for a budget tier
pub fn budget_range(budget: &str) -> Option<&'static str> {
    match budget {
        "Micro-budget" => Some("< $100k"),
        "Indie" => Some("$100k - $10M"),
        "Studio" => Some("$10M - $50M"),
        "Blockbuster" => Some("> $50M"),
        _ => None,
    }
}

/// A fully resolved spin: every category has a concrete, validated value.
#[derive(Debug, Clone)]
pub struct Selections {
    pub region: String,
    pub genre: String,
    pub decade: String,
    pub budget: String,
    pub budget_range: &'static str,
}

/// Validates the caller's choices and fills any missing category with a
/// uniform random draw.
pub fn resolve(picked: &CategorySelections) -> AppResult<Selections> {
    let mut rng = rand::thread_rng();

    let region = pick_or_validate(&picked.region, REGIONS, "region", &mut rng)?;
    let genre = pick_or_validate(&picked.genre, GENRES, "genre", &mut rng)?;
    let decade = pick_or_validate(&picked.decade, DECADES, "decade", &mut rng)?;
    let budget = pick_or_validate(&picked.budget, BUDGETS, "budget", &mut rng)?;

    let budget_range = budget_range(&budget)
        .ok_or_else(|| AppError::Internal(format!("no range for budget tier {budget}")))?;

    Ok(Selections {
        region,
        genre,
        decade,
        budget,
        budget_range,
    })
}

fn pick_or_validate(
    value: &Option<String>,
    allowed: &'static [&'static str],
    label: &str,
    rng: &mut impl Rng,
) -> AppResult<String> {
    match value {
        Some(v) if allowed.contains(&v.as_str()) => Ok(v.clone()),
        Some(v) => Err(AppError::InvalidInput(format!("Unknown {label}: {v}"))),
        None => Ok(allowed[rng.gen_range(0..allowed.len())].to_string()),
    }
}
