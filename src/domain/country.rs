//! Country name normalization.
//!
//! Callers own a [`CountryLookup`] and pass it to the pipeline and the service; there is no
//! process-wide converter.

use std::collections::HashMap;

/// Value written to both `country` and `country_code` when a country cannot be resolved.
pub const NOT_FOUND: &str = "Not Found";

/// A resolved country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryMatch {
    /// Canonical short name, e.g. `United Kingdom`.
    pub name: String,
    /// ISO 3166-1 alpha-3 code, e.g. `GBR`.
    pub iso3: String,
}

impl CountryMatch {
    /// The sentinel pair used by the CSV pipeline for unmatched values.
    pub fn not_found() -> Self {
        Self {
            name: NOT_FOUND.to_string(),
            iso3: NOT_FOUND.to_string(),
        }
    }
}

pub trait CountryLookup: Send + Sync {
    /// Resolves free-form input (name, alias, ISO2 or ISO3 code) to a canonical country.
    fn resolve(&self, raw: &str) -> Option<CountryMatch>;
}

struct CountryEntry {
    name: &'static str,
    iso2: &'static str,
    iso3: &'static str,
    aliases: &'static [&'static str],
}

const fn entry(
    name: &'static str,
    iso2: &'static str,
    iso3: &'static str,
    aliases: &'static [&'static str],
) -> CountryEntry {
    CountryEntry {
        name,
        iso2,
        iso3,
        aliases,
    }
}

const COUNTRIES: &[CountryEntry] = &[
    entry("Afghanistan", "AF", "AFG", &[]),
    entry("Aland Islands", "AX", "ALA", &["åland islands", "åland"]),
    entry("Albania", "AL", "ALB", &[]),
    entry("Algeria", "DZ", "DZA", &[]),
    entry("American Samoa", "AS", "ASM", &[]),
    entry("Andorra", "AD", "AND", &[]),
    entry("Angola", "AO", "AGO", &[]),
    entry("Anguilla", "AI", "AIA", &[]),
    entry("Antarctica", "AQ", "ATA", &[]),
    entry("Antigua and Barbuda", "AG", "ATG", &["antigua"]),
    entry("Argentina", "AR", "ARG", &["argentine republic"]),
    entry("Armenia", "AM", "ARM", &[]),
    entry("Aruba", "AW", "ABW", &[]),
    entry("Australia", "AU", "AUS", &["commonwealth of australia"]),
    entry("Austria", "AT", "AUT", &["republic of austria", "osterreich", "österreich"]),
    entry("Azerbaijan", "AZ", "AZE", &[]),
    entry("Bahamas", "BS", "BHS", &[]),
    entry("Bahrain", "BH", "BHR", &[]),
    entry("Bangladesh", "BD", "BGD", &[]),
    entry("Barbados", "BB", "BRB", &[]),
    entry("Belarus", "BY", "BLR", &[]),
    entry("Belgium", "BE", "BEL", &["kingdom of belgium", "belgique", "belgie"]),
    entry("Belize", "BZ", "BLZ", &[]),
    entry("Benin", "BJ", "BEN", &[]),
    entry("Bermuda", "BM", "BMU", &[]),
    entry("Bhutan", "BT", "BTN", &[]),
    entry("Bolivia", "BO", "BOL", &["plurinational state of bolivia"]),
    entry("Bonaire, Sint Eustatius and Saba", "BQ", "BES", &["caribbean netherlands", "bonaire"]),
    entry("Bosnia and Herzegovina", "BA", "BIH", &["bosnia"]),
    entry("Botswana", "BW", "BWA", &[]),
    entry("Bouvet Island", "BV", "BVT", &[]),
    entry("Brazil", "BR", "BRA", &["brasil", "federative republic of brazil"]),
    entry("British Indian Ocean Territory", "IO", "IOT", &[]),
    entry("British Virgin Islands", "VG", "VGB", &["virgin islands british"]),
    entry("Brunei", "BN", "BRN", &["brunei darussalam"]),
    entry("Bulgaria", "BG", "BGR", &[]),
    entry("Burkina Faso", "BF", "BFA", &[]),
    entry("Burundi", "BI", "BDI", &[]),
    entry("Cambodia", "KH", "KHM", &[]),
    entry("Cameroon", "CM", "CMR", &[]),
    entry("Canada", "CA", "CAN", &[]),
    entry("Cape Verde", "CV", "CPV", &["cabo verde"]),
    entry("Cayman Islands", "KY", "CYM", &[]),
    entry("Central African Republic", "CF", "CAF", &[]),
    entry("Chad", "TD", "TCD", &[]),
    entry("Chile", "CL", "CHL", &[]),
    entry("China", "CN", "CHN", &["peoples republic of china", "prc", "mainland china"]),
    entry("Christmas Island", "CX", "CXR", &[]),
    entry("Cocos (Keeling) Islands", "CC", "CCK", &["cocos islands"]),
    entry("Colombia", "CO", "COL", &[]),
    entry("Comoros", "KM", "COM", &[]),
    entry("Congo", "CG", "COG", &["republic of the congo", "congo brazzaville"]),
    entry("Cook Islands", "CK", "COK", &[]),
    entry("Costa Rica", "CR", "CRI", &[]),
    entry("Cote d'Ivoire", "CI", "CIV", &["côte d'ivoire", "ivory coast"]),
    entry("Croatia", "HR", "HRV", &["hrvatska"]),
    entry("Cuba", "CU", "CUB", &[]),
    entry("Curacao", "CW", "CUW", &["curaçao"]),
    entry("Cyprus", "CY", "CYP", &[]),
    entry("Czech Republic", "CZ", "CZE", &["czechia"]),
    entry("DR Congo", "CD", "COD", &["democratic republic of the congo", "congo kinshasa", "drc"]),
    entry("Denmark", "DK", "DNK", &["danmark", "kingdom of denmark"]),
    entry("Djibouti", "DJ", "DJI", &[]),
    entry("Dominica", "DM", "DMA", &[]),
    entry("Dominican Republic", "DO", "DOM", &[]),
    entry("Ecuador", "EC", "ECU", &[]),
    entry("Egypt", "EG", "EGY", &["arab republic of egypt"]),
    entry("El Salvador", "SV", "SLV", &[]),
    entry("Equatorial Guinea", "GQ", "GNQ", &[]),
    entry("Eritrea", "ER", "ERI", &[]),
    entry("Estonia", "EE", "EST", &["eesti"]),
    entry("Eswatini", "SZ", "SWZ", &["swaziland"]),
    entry("Ethiopia", "ET", "ETH", &[]),
    entry("Falkland Islands", "FK", "FLK", &["falkland islands malvinas", "malvinas"]),
    entry("Faroe Islands", "FO", "FRO", &["faroes"]),
    entry("Fiji", "FJ", "FJI", &[]),
    entry("Finland", "FI", "FIN", &["suomi"]),
    entry("France", "FR", "FRA", &["french republic"]),
    entry("French Guiana", "GF", "GUF", &[]),
    entry("French Polynesia", "PF", "PYF", &[]),
    entry("French Southern Territories", "TF", "ATF", &[]),
    entry("Gabon", "GA", "GAB", &[]),
    entry("Gambia", "GM", "GMB", &[]),
    entry("Georgia", "GE", "GEO", &[]),
    entry("Germany", "DE", "DEU", &["deutschland", "federal republic of germany"]),
    entry("Ghana", "GH", "GHA", &[]),
    entry("Gibraltar", "GI", "GIB", &[]),
    entry("Greece", "GR", "GRC", &["hellas", "hellenic republic"]),
    entry("Greenland", "GL", "GRL", &[]),
    entry("Grenada", "GD", "GRD", &[]),
    entry("Guadeloupe", "GP", "GLP", &[]),
    entry("Guam", "GU", "GUM", &[]),
    entry("Guatemala", "GT", "GTM", &[]),
    entry("Guernsey", "GG", "GGY", &[]),
    entry("Guinea", "GN", "GIN", &[]),
    entry("Guinea-Bissau", "GW", "GNB", &[]),
    entry("Guyana", "GY", "GUY", &[]),
    entry("Haiti", "HT", "HTI", &[]),
    entry("Heard Island and McDonald Islands", "HM", "HMD", &[]),
    entry("Honduras", "HN", "HND", &[]),
    entry("Hong Kong", "HK", "HKG", &["hong kong sar"]),
    entry("Hungary", "HU", "HUN", &["magyarorszag"]),
    entry("Iceland", "IS", "ISL", &[]),
    entry("India", "IN", "IND", &["republic of india", "bharat"]),
    entry("Indonesia", "ID", "IDN", &[]),
    entry("Iran", "IR", "IRN", &["islamic republic of iran", "persia"]),
    entry("Iraq", "IQ", "IRQ", &[]),
    entry("Ireland", "IE", "IRL", &["republic of ireland", "eire"]),
    entry("Isle of Man", "IM", "IMN", &[]),
    entry("Israel", "IL", "ISR", &["state of israel"]),
    entry("Italy", "IT", "ITA", &["italia", "italian republic"]),
    entry("Jamaica", "JM", "JAM", &[]),
    entry("Japan", "JP", "JPN", &["nippon"]),
    entry("Jersey", "JE", "JEY", &[]),
    entry("Jordan", "JO", "JOR", &[]),
    entry("Kazakhstan", "KZ", "KAZ", &[]),
    entry("Kenya", "KE", "KEN", &[]),
    entry("Kiribati", "KI", "KIR", &[]),
    entry("Kuwait", "KW", "KWT", &[]),
    entry("Kyrgyzstan", "KG", "KGZ", &["kyrgyz republic"]),
    entry("Laos", "LA", "LAO", &["lao pdr", "lao peoples democratic republic"]),
    entry("Latvia", "LV", "LVA", &[]),
    entry("Lebanon", "LB", "LBN", &[]),
    entry("Lesotho", "LS", "LSO", &[]),
    entry("Liberia", "LR", "LBR", &[]),
    entry("Libya", "LY", "LBY", &[]),
    entry("Liechtenstein", "LI", "LIE", &[]),
    entry("Lithuania", "LT", "LTU", &[]),
    entry("Luxembourg", "LU", "LUX", &[]),
    entry("Macau", "MO", "MAC", &["macao"]),
    entry("Madagascar", "MG", "MDG", &[]),
    entry("Malawi", "MW", "MWI", &[]),
    entry("Malaysia", "MY", "MYS", &[]),
    entry("Maldives", "MV", "MDV", &[]),
    entry("Mali", "ML", "MLI", &[]),
    entry("Malta", "MT", "MLT", &[]),
    entry("Marshall Islands", "MH", "MHL", &[]),
    entry("Martinique", "MQ", "MTQ", &[]),
    entry("Mauritania", "MR", "MRT", &[]),
    entry("Mauritius", "MU", "MUS", &[]),
    entry("Mayotte", "YT", "MYT", &[]),
    entry("Mexico", "MX", "MEX", &["united mexican states", "mejico"]),
    entry("Micronesia", "FM", "FSM", &["federated states of micronesia"]),
    entry("Moldova", "MD", "MDA", &["republic of moldova"]),
    entry("Monaco", "MC", "MCO", &[]),
    entry("Mongolia", "MN", "MNG", &[]),
    entry("Montenegro", "ME", "MNE", &[]),
    entry("Montserrat", "MS", "MSR", &[]),
    entry("Morocco", "MA", "MAR", &[]),
    entry("Mozambique", "MZ", "MOZ", &[]),
    entry("Myanmar", "MM", "MMR", &["burma"]),
    entry("Namibia", "NA", "NAM", &[]),
    entry("Nauru", "NR", "NRU", &[]),
    entry("Nepal", "NP", "NPL", &[]),
    entry("Netherlands", "NL", "NLD", &["holland", "nederland"]),
    entry("New Caledonia", "NC", "NCL", &[]),
    entry("New Zealand", "NZ", "NZL", &["aotearoa"]),
    entry("Nicaragua", "NI", "NIC", &[]),
    entry("Niger", "NE", "NER", &[]),
    entry("Nigeria", "NG", "NGA", &[]),
    entry("Niue", "NU", "NIU", &[]),
    entry("Norfolk Island", "NF", "NFK", &[]),
    entry("North Korea", "KP", "PRK", &["dprk", "democratic peoples republic of korea"]),
    entry("North Macedonia", "MK", "MKD", &["macedonia"]),
    entry("Northern Mariana Islands", "MP", "MNP", &[]),
    entry("Norway", "NO", "NOR", &["norge"]),
    entry("Oman", "OM", "OMN", &[]),
    entry("Pakistan", "PK", "PAK", &[]),
    entry("Palau", "PW", "PLW", &[]),
    entry("Palestine", "PS", "PSE", &["state of palestine", "palestinian territories"]),
    entry("Panama", "PA", "PAN", &[]),
    entry("Papua New Guinea", "PG", "PNG", &[]),
    entry("Paraguay", "PY", "PRY", &[]),
    entry("Peru", "PE", "PER", &[]),
    entry("Philippines", "PH", "PHL", &[]),
    entry("Pitcairn", "PN", "PCN", &["pitcairn islands"]),
    entry("Poland", "PL", "POL", &["polska"]),
    entry("Portugal", "PT", "PRT", &["portuguese republic"]),
    entry("Puerto Rico", "PR", "PRI", &[]),
    entry("Qatar", "QA", "QAT", &[]),
    entry("Reunion", "RE", "REU", &["réunion"]),
    entry("Romania", "RO", "ROU", &[]),
    entry("Russia", "RU", "RUS", &["russian federation"]),
    entry("Rwanda", "RW", "RWA", &[]),
    entry("Saint Barthelemy", "BL", "BLM", &["saint barthélemy", "st barthelemy"]),
    entry("Saint Helena", "SH", "SHN", &["saint helena ascension and tristan da cunha"]),
    entry("Saint Kitts and Nevis", "KN", "KNA", &["st kitts and nevis"]),
    entry("Saint Lucia", "LC", "LCA", &["st lucia"]),
    entry("Saint Martin", "MF", "MAF", &["saint martin french part"]),
    entry("Saint Pierre and Miquelon", "PM", "SPM", &[]),
    entry("Saint Vincent and the Grenadines", "VC", "VCT", &["st vincent and the grenadines"]),
    entry("Samoa", "WS", "WSM", &[]),
    entry("San Marino", "SM", "SMR", &[]),
    entry("Sao Tome and Principe", "ST", "STP", &["são tomé and príncipe"]),
    entry("Saudi Arabia", "SA", "SAU", &["kingdom of saudi arabia", "ksa"]),
    entry("Senegal", "SN", "SEN", &[]),
    entry("Serbia", "RS", "SRB", &[]),
    entry("Seychelles", "SC", "SYC", &[]),
    entry("Sierra Leone", "SL", "SLE", &[]),
    entry("Singapore", "SG", "SGP", &["republic of singapore"]),
    entry("Sint Maarten", "SX", "SXM", &["sint maarten dutch part"]),
    entry("Slovakia", "SK", "SVK", &["slovak republic"]),
    entry("Slovenia", "SI", "SVN", &[]),
    entry("Solomon Islands", "SB", "SLB", &[]),
    entry("Somalia", "SO", "SOM", &[]),
    entry("South Africa", "ZA", "ZAF", &["republic of south africa", "rsa"]),
    entry("South Georgia and the South Sandwich Islands", "GS", "SGS", &["south georgia"]),
    entry("South Korea", "KR", "KOR", &["korea", "republic of korea", "korea republic of"]),
    entry("South Sudan", "SS", "SSD", &[]),
    entry("Spain", "ES", "ESP", &["espana", "españa", "kingdom of spain"]),
    entry("Sri Lanka", "LK", "LKA", &[]),
    entry("Sudan", "SD", "SDN", &[]),
    entry("Suriname", "SR", "SUR", &[]),
    entry("Svalbard and Jan Mayen", "SJ", "SJM", &[]),
    entry("Sweden", "SE", "SWE", &["sverige", "kingdom of sweden"]),
    entry("Switzerland", "CH", "CHE", &["swiss confederation", "schweiz", "suisse"]),
    entry("Syria", "SY", "SYR", &["syrian arab republic"]),
    entry("Taiwan", "TW", "TWN", &["republic of china"]),
    entry("Tajikistan", "TJ", "TJK", &[]),
    entry("Tanzania", "TZ", "TZA", &["united republic of tanzania"]),
    entry("Thailand", "TH", "THA", &[]),
    entry("Timor-Leste", "TL", "TLS", &["east timor"]),
    entry("Togo", "TG", "TGO", &[]),
    entry("Tokelau", "TK", "TKL", &[]),
    entry("Tonga", "TO", "TON", &[]),
    entry("Trinidad and Tobago", "TT", "TTO", &[]),
    entry("Tunisia", "TN", "TUN", &[]),
    entry("Turkey", "TR", "TUR", &["turkiye", "türkiye", "republic of turkey"]),
    entry("Turkmenistan", "TM", "TKM", &[]),
    entry("Turks and Caicos Islands", "TC", "TCA", &[]),
    entry("Tuvalu", "TV", "TUV", &[]),
    entry("Uganda", "UG", "UGA", &[]),
    entry("Ukraine", "UA", "UKR", &[]),
    entry("United Arab Emirates", "AE", "ARE", &["uae", "emirates"]),
    entry(
        "United Kingdom",
        "GB",
        "GBR",
        &[
            "uk",
            "great britain",
            "britain",
            "england",
            "scotland",
            "wales",
            "northern ireland",
            "united kingdom of great britain and northern ireland",
        ],
    ),
    entry("United States", "US", "USA", &["united states of america", "america", "us of a"]),
    entry("United States Minor Outlying Islands", "UM", "UMI", &[]),
    entry("United States Virgin Islands", "VI", "VIR", &["us virgin islands", "virgin islands us"]),
    entry("Uruguay", "UY", "URY", &[]),
    entry("Uzbekistan", "UZ", "UZB", &[]),
    entry("Vanuatu", "VU", "VUT", &[]),
    entry("Vatican City", "VA", "VAT", &["holy see", "vatican"]),
    entry("Venezuela", "VE", "VEN", &[]),
    entry("Vietnam", "VN", "VNM", &["viet nam"]),
    entry("Wallis and Futuna", "WF", "WLF", &[]),
    entry("Western Sahara", "EH", "ESH", &[]),
    entry("Yemen", "YE", "YEM", &[]),
    entry("Zambia", "ZM", "ZMB", &[]),
    entry("Zimbabwe", "ZW", "ZWE", &[]),
];

/// Lookup over the ISO 3166-1 country list and common aliases.
pub struct CountryTable {
    index: HashMap<String, usize>,
}

impl CountryTable {
    /// Table with the built-in country list.
    pub fn builtin() -> Self {
        let mut index = HashMap::new();
        for (i, c) in COUNTRIES.iter().enumerate() {
            for key in [c.name, c.iso2, c.iso3].iter().chain(c.aliases.iter()) {
                index.insert(normalize_key(key), i);
            }
        }
        Self { index }
    }

    pub fn len(&self) -> usize {
        COUNTRIES.len()
    }

    pub fn is_empty(&self) -> bool {
        COUNTRIES.is_empty()
    }
}

impl Default for CountryTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CountryLookup for CountryTable {
    fn resolve(&self, raw: &str) -> Option<CountryMatch> {
        let key = normalize_key(raw);
        let key = key.strip_prefix("the ").unwrap_or(&key);
        self.index.get(key).map(|&i| {
            let c = &COUNTRIES[i];
            CountryMatch {
                name: c.name.to_string(),
                iso3: c.iso3.to_string(),
            }
        })
    }
}

/// Lower-cases, drops dots and apostrophes, maps punctuation to spaces and collapses
/// whitespace: `"U.S.A."` -> `"usa"`, `"Korea, Republic of"` -> `"korea republic of"`.
fn normalize_key(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '.' | '\''))
        .flat_map(|c| {
            let mapped = if c.is_alphanumeric() { c } else { ' ' };
            mapped.to_lowercase()
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
