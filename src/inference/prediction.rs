use serde::Serialize;

/// Classifier output for one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Raw model outputs in label order. Not guaranteed to sum to 1.
    pub probabilities: Vec<f64>,
    pub index: usize,
    pub label: String,
    /// `probabilities[index] * 100`.
    pub confidence: f64,
}

impl Prediction {
    /// Confidence as shown to users, e.g. `"87.25%"`.
    pub fn confidence_display(&self) -> String {
        format!("{:.2}%", self.confidence)
    }

    /// `(label, probability)` pairs, highest first. Stable for ties.
    pub fn ranked<'a>(&self, labels: &'a [String]) -> Vec<(&'a str, f64)> {
        let mut pairs: Vec<(&str, f64)> = labels.iter()
            .map(String::as_str)
            .zip(self.probabilities.iter().copied())
            .collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        pairs
    }
}

/// Index of the largest value; the first one wins on exact ties.
/// `None` for an empty slice.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_picks_largest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
    }

    #[test]
    fn argmax_first_maximum_wins() {
        assert_eq!(argmax(&[0.4, 0.1, 0.4, 0.1]), Some(0));
    }

    #[test]
    fn argmax_of_empty_is_none() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn confidence_is_two_decimal_percent() {
        let p = Prediction {
            probabilities: vec![0.12744, 0.87256],
            index: 1,
            label: "b".into(),
            confidence: 87.256,
        };
        assert_eq!(p.confidence_display(), "87.26%");
    }

    #[test]
    fn ranked_sorts_descending() {
        let p = Prediction { probabilities: vec![0.2, 0.5, 0.3], index: 1, label: "y".into(), confidence: 50.0 };
        let labels = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        let ranked = p.ranked(&labels);
        assert_eq!(ranked.iter().map(|r| r.0).collect::<Vec<_>>(), vec!["y", "z", "x"]);
    }
}
