use omr_recovery::core::{
    ClassifierError, Evaluation, EvaluationSource, GlyphGeometry, PixelRect, Scale, Shape,
    ShapeSet,
};
use omr_recovery::timesig::{
    Chord, Clef, Measure, Note, ScoreSystem, Staff, StaffLine, SystemPart,
};
use omr_recovery::{
    recover_pages, recover_with_config, Page, PageOutcome, RecoveryConfig, RecoveryReport,
    TimeSignatureRetriever,
};

fn four_four(
    glyph: &dyn GlyphGeometry,
    _: &ShapeSet,
) -> Result<Option<Evaluation>, ClassifierError> {
    let shape = if glyph.bounds().height >= 100 {
        Shape::TimeFourFour
    } else {
        Shape::TimeFour
    };
    Ok(Some(Evaluation::new(shape, 0.91, EvaluationSource::Classifier)))
}

/// One staff at y=200 with a split 4/4 between the clef and the first note.
fn page(id: u32) -> Page {
    let mut measure = Measure::new(1);
    measure.clefs.push(Clef {
        staff: 1,
        shape: Shape::GClef,
        bounds: PixelRect::new(100, 160, 60, 200),
    });
    measure.chords.push(Chord {
        staff: 1,
        notes: vec![Note {
            bounds: PixelRect::new(360, 240, 24, 20),
            accidental: None,
        }],
    });

    let mut system = ScoreSystem::new(1, 0, 2000);
    let staff = Staff::new(1, StaffLine::horizontal(200.0, 0.0, 2000.0), 120);
    system
        .parts
        .push(SystemPart::new(1, vec![staff], vec![measure]));
    system.glyphs.add_rect(PixelRect::new(240, 200, 40, 60));
    system.glyphs.add_rect(PixelRect::new(240, 260, 40, 60));

    let mut page = Page::new(id, Scale::new(30));
    page.systems.push(system);
    page
}

#[test]
fn failed_page_does_not_affect_the_next() {
    let mut broken = page(1);
    broken.systems[0].parts[0].staves[0].first_line = StaffLine::horizontal(200.0, 5.0, 5.0);
    let mut pages = vec![broken, page(2)];

    let outcomes = recover_pages(&mut pages, &TimeSignatureRetriever::default(), &four_four);

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].is_failure());
    assert_eq!(outcomes[1].recovered_count(), 1);
    assert_eq!(pages[0].systems[0].glyphs.len(), 2);
    assert_eq!(pages[1].systems[0].glyphs.len(), 3);
}

#[test]
fn page_without_system_is_a_failure() {
    let mut pages = vec![Page::new(7, Scale::new(30)), page(8)];

    let outcomes = recover_pages(&mut pages, &TimeSignatureRetriever::default(), &four_four);

    let PageOutcome::UnexpectedFailure { cause, staves } = &outcomes[0] else {
        panic!("unexpected outcome {:?}", outcomes[0]);
    };
    assert!(staves.is_empty());
    assert!(cause.contains("no system"), "{cause}");
    assert_eq!(outcomes[1].recovered_count(), 1);
}

#[test]
fn report_follows_page_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recovery.json");
    std::fs::write(&path, r#"{ "time_signature": { "min_grade": 0.95 } }"#).unwrap();
    let config = RecoveryConfig::load_json(&path).unwrap();

    let mut pages = vec![page(3), page(4)];
    let report = recover_with_config(&mut pages, &config, &four_four);

    assert_eq!(
        report.pages.iter().map(|p| p.page).collect::<Vec<_>>(),
        vec![3, 4]
    );
    assert_eq!(report.recovered_count(), 0);

    let json = serde_json::to_string(&report).unwrap();
    let back: RecoveryReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}
