/// A detected short-window surge in incident frequency for one type.
#[derive(Debug, Clone)]
pub struct Spike {
    pub incident_type: String,
    pub previous_count: u64,
    pub current_count: u64,
    /// Fractional growth: 0.5 means +50% against the previous window.
    pub growth_rate: f64,
}

impl Spike {
    /// Banner text for the alert strip, e.g. `"DDOS (+50%)"`.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub fn banner_label(&self) -> String {
        let pct = (self.growth_rate * 100.0).round() as i64;
        format!("{} ({pct:+}%)", self.incident_type.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_label_formats_growth_pct() {
        let spike = Spike {
            incident_type: "ddos".into(),
            previous_count: 4,
            current_count: 6,
            growth_rate: 0.5,
        };
        assert_eq!(spike.banner_label(), "DDOS (+50%)");
    }

    #[test]
    fn banner_label_keeps_negative_sign() {
        let spike = Spike {
            incident_type: "phishing".into(),
            previous_count: 10,
            current_count: 8,
            growth_rate: -0.2,
        };
        assert_eq!(spike.banner_label(), "PHISHING (-20%)");
    }
}
