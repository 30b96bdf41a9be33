//! Vehicle data record and the shared text/number formatting policy.
//!
//! All fields are plain strings supplied fresh per render call by the
//! orchestrator (form inputs, in practice). Empty means absent: a missing
//! field drops its line from the layout instead of rendering a placeholder.

use serde::{Deserialize, Serialize};

/// Output encoding requested for a render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Jpg,
    Png,
}

impl ExportFormat {
    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Jpg => "image/jpeg",
            ExportFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Jpg => "jpg",
            ExportFormat::Png => "png",
        }
    }
}

/// Flat record of everything the templates can print about a vehicle.
///
/// `export_format`/`export_quality` are transient export directives that ride
/// along with the data record; quality is only meaningful for jpg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleData {
    pub brand: String,
    pub model: String,
    pub year: String,
    pub version: String,
    pub engine: String,
    pub gearbox: String,
    pub motor_traction: String,
    pub km: String,
    pub km_hidden: bool,
    pub extra1: String,
    pub extra2: String,
    pub client_name: String,
    pub sold_text: String,
    pub export_format: ExportFormat,
    pub export_quality: f32,
}

impl Default for VehicleData {
    fn default() -> Self {
        Self {
            brand: String::new(),
            model: String::new(),
            year: String::new(),
            version: String::new(),
            engine: String::new(),
            gearbox: String::new(),
            motor_traction: String::new(),
            km: String::new(),
            km_hidden: false,
            extra1: String::new(),
            extra2: String::new(),
            client_name: String::new(),
            sold_text: String::new(),
            export_format: ExportFormat::default(),
            export_quality: 0.92,
        }
    }
}

impl VehicleData {
    /// Export quality clamped to (0, 1]; non-finite or zero falls back to 0.92.
    pub fn effective_quality(&self) -> f32 {
        if self.export_quality.is_finite() && self.export_quality > 0.0 {
            self.export_quality.min(1.0)
        } else {
            0.92
        }
    }
}

/// Collapse runs of whitespace and trim the ends.
///
/// Applied to every free-text field before measuring or drawing, so an
/// accidental double space can't blow a line past its fitted width.
pub fn clean_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trimmed, uppercased copy of a field.
pub fn upper(s: &str) -> String {
    s.trim().to_uppercase()
}

/// First letter upper, rest lower ("manual" → "Manual").
pub fn capitalize(s: &str) -> String {
    let s = clean_spaces(s);
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Format a raw mileage field for display, grouped with "." every three
/// digits ("12345" → "12.345").
///
/// Returns an empty string unless the field parses to a finite number > 0 —
/// an empty or junk field must not render as "0KM".
pub fn format_mileage(km: &str) -> String {
    let raw = km.trim();
    if raw.is_empty() {
        return String::new();
    }
    let Ok(n) = raw.parse::<f64>() else {
        return String::new();
    };
    if !n.is_finite() || n <= 0.0 {
        return String::new();
    }
    group_thousands(n.trunc() as i64)
}

fn group_thousands(n: i64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Lowercase slug for file names: diacritics folded, anything outside
/// `[a-z0-9]` collapsed to single dashes.
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_dash = true; // suppress a leading dash
    for ch in clean_spaces(s).to_lowercase().chars() {
        let folded = fold_diacritic(ch);
        if folded.is_ascii_alphanumeric() {
            out.push(folded);
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// ASCII-fold the accented characters that show up in the target market's
/// data entry. Everything else passes through untouched.
fn fold_diacritic(ch: char) -> char {
    match ch {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// Two-digit, zero-padded index for output file names.
pub fn pad2(n: usize) -> String {
    format!("{n:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mileage_empty_and_invalid_render_nothing() {
        assert_eq!(format_mileage(""), "");
        assert_eq!(format_mileage("   "), "");
        assert_eq!(format_mileage("0"), "");
        assert_eq!(format_mileage("-5"), "");
        assert_eq!(format_mileage("abc"), "");
        assert_eq!(format_mileage("NaN"), "");
        assert_eq!(format_mileage("inf"), "");
    }

    #[test]
    fn mileage_groups_thousands_with_dots() {
        assert_eq!(format_mileage("5"), "5");
        assert_eq!(format_mileage("999"), "999");
        assert_eq!(format_mileage("1000"), "1.000");
        assert_eq!(format_mileage("12345"), "12.345");
        assert_eq!(format_mileage("85000"), "85.000");
        assert_eq!(format_mileage("1234567"), "1.234.567");
    }

    #[test]
    fn mileage_truncates_fractions() {
        assert_eq!(format_mileage("12345.9"), "12.345");
    }

    #[test]
    fn clean_spaces_collapses_runs() {
        assert_eq!(clean_spaces("  Ford   Fiesta \t SE "), "Ford Fiesta SE");
        assert_eq!(clean_spaces(""), "");
    }

    #[test]
    fn capitalize_normalizes_case() {
        assert_eq!(capitalize("manual"), "Manual");
        assert_eq!(capitalize("AUTOMATICA"), "Automatica");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn slug_folds_accents_and_punctuation() {
        assert_eq!(slugify("Citroën C4"), "citroen-c4");
        assert_eq!(slugify("  Peugeot / 208  "), "peugeot-208");
        assert_eq!(slugify("Año 2020!"), "ano-2020");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn quality_clamps_to_sane_range() {
        let mut data = VehicleData::default();
        assert_eq!(data.effective_quality(), 0.92);
        data.export_quality = 2.0;
        assert_eq!(data.effective_quality(), 1.0);
        data.export_quality = -1.0;
        assert_eq!(data.effective_quality(), 0.92);
        data.export_quality = f32::NAN;
        assert_eq!(data.effective_quality(), 0.92);
        data.export_quality = 0.5;
        assert_eq!(data.effective_quality(), 0.5);
    }

    #[test]
    fn data_deserializes_camel_case_with_defaults() {
        let data: VehicleData =
            serde_json::from_str(r#"{"brand":"Ford","kmHidden":true,"exportFormat":"png"}"#)
                .unwrap();
        assert_eq!(data.brand, "Ford");
        assert!(data.km_hidden);
        assert_eq!(data.export_format, ExportFormat::Png);
        assert_eq!(data.effective_quality(), 0.92);
    }

    #[test]
    fn pad2_pads_single_digits() {
        assert_eq!(pad2(1), "01");
        assert_eq!(pad2(12), "12");
    }
}
