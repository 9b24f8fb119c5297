// tests/classify_vocabulary.rs
// Keyword-list classifier: lower-cased matching and first-hit inspection.

use alt_purchase_analyzer::{
    AlternateClassifier, BrandKeywordClassifier, Catalog, ClassifierConfig, Label, PurchaseTable,
    VocabularyClassifier,
};

const COLUMN: &str = "n2_purchased_product_title";

fn purchases() -> PurchaseTable {
    PurchaseTable::from_text_rows(
        &["start_date", "asin", "product_title", COLUMN],
        &[
            &["2023-05-01", "B0HIL1", "Hill's Science Diet Adult", "Blue Buffalo Dry Dog Food"],
            &["2023-05-01", "B0HIL2", "Hill's Prescription Diet", "HILL'S SCIENCE DIET ADULT"],
            &["2023-05-02", "B0HIL1", "Hill's Science Diet Adult", "Kong Squeaky Ball"],
            &["2023-05-02", "B0HIL3", "Hill's Ideal Balance", "Hill's Ideal Balance Wet Cat Food"],
            &["2023-05-03", "B0HIL2", "Hill's Prescription Diet", "Dental Chews by Hill's"],
        ],
    )
    .unwrap()
}

fn catalog() -> Catalog {
    Catalog::from_titles([
        "Hill's Science Diet Adult",
        "Hill's Prescription Diet",
        "Hill's Ideal Balance",
    ])
}

#[test]
fn internal_check_ignores_case() {
    let out = VocabularyClassifier::new(&catalog())
        .classify(&purchases(), COLUMN)
        .unwrap();
    assert_eq!(
        out.internal_labels(),
        vec![Label::No, Label::Yes, Label::No, Label::No, Label::No]
    );
    // the exported title keeps its original casing
    assert_eq!(out.records[1].alternate_title, "HILL'S SCIENCE DIET ADULT");
}

#[test]
fn substitutes_follow_first_vocabulary_hit() {
    let out = VocabularyClassifier::new(&catalog())
        .classify(&purchases(), COLUMN)
        .unwrap();
    assert_eq!(
        out.substitute_labels(),
        vec![
            Label::Yes, // "dry dog food", no brand token
            Label::No,  // brand token first
            Label::No,  // nothing from the vocabulary
            Label::No,  // brand token first
            Label::Yes, // "chews" comes before the brand token
        ]
    );
}

#[test]
fn no_reference_title_rule_in_vocabulary_variant() {
    // An alternate equal to a reference product_title is still judged by the
    // vocabulary alone, while the brand/keyword variant always says "no".
    let t = PurchaseTable::from_text_rows(
        &["start_date", "asin", "product_title", COLUMN],
        &[
            &["2023-05-01", "B0PUR1", "Purina Dog Food", "Purina Dog Food"],
            &["2023-05-01", "B0PUR2", "Iams Cat Food", "Purina Dog Food"],
        ],
    )
    .unwrap();

    let vocab = VocabularyClassifier::new(&Catalog::default())
        .classify(&t, COLUMN)
        .unwrap();
    assert_eq!(vocab.substitute_labels(), vec![Label::Yes, Label::Yes]);

    let generic = BrandKeywordClassifier::new(
        Catalog::default(),
        ClassifierConfig::new("Iams", "Dog Food"),
    )
    .classify(&t, COLUMN)
    .unwrap();
    assert_eq!(generic.substitute_labels(), vec![Label::No, Label::No]);
}
