use micro_body::{FlatPair, StructuredPair, StructuredValue};

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    fields: usize,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, fields: usize) -> Self {
        Self { name, group, fields }
    }

    pub fn small(name: &'static str) -> Self {
        Self::new(name, TestGroup::Small, 4)
    }

    pub fn normal(name: &'static str) -> Self {
        Self::new(name, TestGroup::Normal, 32)
    }

    pub fn large(name: &'static str) -> Self {
        Self::new(name, TestGroup::Large, 512)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn fields(&self) -> usize {
        self.fields
    }

    /// Structured fields alternating strings, numbers and nested arrays.
    pub fn structured_body(&self) -> Vec<StructuredPair<String>> {
        (0..self.fields)
            .map(|i| {
                let key = format!("field_{i}");
                match i % 3 {
                    0 => StructuredPair::set(key, format!("value {i}")),
                    1 => StructuredPair::set(key, i),
                    _ => StructuredPair::set(key, StructuredValue::from(vec![i, i + 1, i + 2])),
                }
            })
            .collect()
    }

    pub fn flat_body(&self) -> Vec<FlatPair<String>> {
        (0..self.fields).map(|i| FlatPair::set(format!("field_{i}"), format!("value{i}"))).collect()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}
