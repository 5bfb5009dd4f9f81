use std::collections::BTreeMap;

use super::samples::DomainSamples;

/// Samples per label, in label order.
pub fn label_counts(samples: &DomainSamples) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for &label in samples.labels() {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

pub fn print_domain_info(name: &str, samples: &DomainSamples) {
    let counts = label_counts(samples);

    println!("Domain: {}", name);
    println!("-------------------");
    println!("Total size: {}", samples.len());
    println!("Categories: {}", counts.len());
    println!();
    for (label, count) in &counts {
        match samples.categories().get(*label as usize) {
            Some(category) => println!("  {:>3} {:<24} {}", label, category, count),
            None => println!("  {:>3} {}", label, count),
        }
    }
    println!();
}
