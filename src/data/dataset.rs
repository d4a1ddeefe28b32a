/// One training record: a feature vector and its (already normalized) label.
///
/// Features and label travel together so they can never fall out of step.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: Vec<f64>,
    pub label: f64,
}

impl Sample {
    pub fn new(features: Vec<f64>, label: f64) -> Self {
        Sample { features, label }
    }
}

/// Ordered, immutable collection of samples.
///
/// Built once by the loader (or from an iterator in tests) and only read
/// during training.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Dataset { samples }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Index and width of the first sample whose feature count differs from
    /// `expected`.
    pub fn find_width_mismatch(&self, expected: usize) -> Option<(usize, usize)> {
        self.samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.features.len() != expected)
            .map(|(i, s)| (i, s.features.len()))
    }

    pub(crate) fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }
}

impl FromIterator<Sample> for Dataset {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Dataset {
            samples: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
