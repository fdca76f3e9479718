use omr_recovery_core::{
    ClassifierError, Evaluation, EvaluationSource, GlyphGeometry, PixelRect, Scale, Shape,
    ShapeSet,
};
use omr_recovery_timesig::{
    Barline, Chord, Clef, Measure, Note, Page, PageOutcome, RecoveryConfig, RecoveryReport,
    ScoreSystem, Staff, StaffLine, StaffResult, SystemPart, TimeRational, TimeSigParams,
    TimeSignature, TimeSignatureRetriever,
};

const INTERLINE: u32 = 30;

/// Two stacked digits read as 4/4 at `grade`; anything shorter is a lone digit.
fn stacked(
    grade: f64,
) -> impl Fn(&dyn GlyphGeometry, &ShapeSet) -> Result<Option<Evaluation>, ClassifierError> {
    move |glyph, _| {
        let shape = if glyph.bounds().height >= 100 {
            Evaluation::new(Shape::TimeFourFour, grade, EvaluationSource::Classifier)
        } else {
            Evaluation::new(Shape::TimeFour, 0.95, EvaluationSource::Classifier)
        };
        Ok(Some(shape))
    }
}

fn failing(
    _: &dyn GlyphGeometry,
    _: &ShapeSet,
) -> Result<Option<Evaluation>, ClassifierError> {
    Err(ClassifierError::Failed("model not loaded".into()))
}

fn staff(id: u32, y: f32) -> Staff {
    Staff::new(id, StaffLine::horizontal(y, 0.0, 2000.0), 120)
}

fn clef(staff: u32, y: i32) -> Clef {
    Clef {
        staff,
        shape: Shape::GClef,
        bounds: PixelRect::new(100, y - 40, 60, 200),
    }
}

fn chord(staff: u32, x: i32, y: i32) -> Chord {
    Chord {
        staff,
        notes: vec![Note {
            bounds: PixelRect::new(x, y, 24, 20),
            accidental: None,
        }],
    }
}

/// One staff at y=200, clef ending at 160, first note at 360: the free band
/// is 160..360 and the reference box 230..290 x 215..305.
fn one_staff_page() -> Page {
    let mut measure = Measure::new(1);
    measure.clefs.push(clef(1, 200));
    measure.chords.push(chord(1, 360, 240));

    let mut system = ScoreSystem::new(1, 0, 2000);
    system
        .parts
        .push(SystemPart::new(1, vec![staff(1, 200.0)], vec![measure]));

    let mut page = Page::new(1, Scale::new(INTERLINE));
    page.systems.push(system);
    page
}

fn two_staff_page() -> Page {
    let mut page = one_staff_page();
    let part = &mut page.systems[0].parts[0];
    part.staves.push(staff(2, 400.0));
    part.measures[0].clefs.push(clef(2, 400));
    part.measures[0].chords.push(chord(2, 360, 440));
    page
}

fn add_digits(page: &mut Page, top: i32) {
    let pool = &mut page.systems[0].glyphs;
    pool.add_rect(PixelRect::new(240, top, 40, 60));
    pool.add_rect(PixelRect::new(240, top + 60, 40, 60));
}

fn retriever() -> TimeSignatureRetriever {
    TimeSignatureRetriever::new(TimeSigParams::default())
}

#[test]
fn recovers_stacked_digits_as_full_time() {
    let mut page = one_staff_page();
    add_digits(&mut page, 200);

    let outcome = retriever().recover_page(&mut page, &stacked(0.9));

    let PageOutcome::Processed { roi, staves } = &outcome else {
        panic!("unexpected outcome {outcome:?}");
    };
    assert_eq!((roi.left, roi.right), (160, 360));
    assert_eq!(staves.len(), 1);
    let StaffResult::Recovered {
        glyph,
        shape,
        rational,
        ..
    } = staves[0].result
    else {
        panic!("staff not recovered: {:?}", staves[0]);
    };
    assert_eq!(shape, Shape::TimeFourFour);
    assert_eq!(rational, TimeRational::new(4, 4));

    let system = &page.systems[0];
    let ts = system.parts[0].measures[0].time_signature(1).unwrap();
    assert_eq!(ts.glyph, Some(glyph));
    assert_eq!(ts.bounds, PixelRect::new(240, 200, 40, 120));

    let compound = system.glyphs.get(glyph).unwrap();
    assert!(compound.is_compound());
    let evaluation = compound.evaluation().unwrap();
    assert_eq!(evaluation.source, EvaluationSource::Algorithm);
    approx::assert_relative_eq!(evaluation.grade, 0.9);
}

#[test]
fn existing_time_signature_leaves_page_untouched() {
    let mut page = one_staff_page();
    add_digits(&mut page, 200);
    page.systems[0].parts[0].measures[0]
        .time_signatures
        .push(TimeSignature {
            staff: 1,
            bounds: PixelRect::new(240, 200, 40, 120),
            shape: Shape::TimeThreeFour,
            rational: TimeRational::new(3, 4),
            glyph: None,
        });

    let outcome = retriever().recover_page(&mut page, &stacked(0.9));

    assert_eq!(outcome, PageOutcome::Satisfied);
    assert_eq!(page.systems[0].glyphs.len(), 2);
    assert_eq!(page.systems[0].parts[0].measures[0].time_signatures.len(), 1);
}

#[test]
fn signature_on_lower_staff_satisfies_the_page() {
    let mut page = two_staff_page();
    add_digits(&mut page, 200);
    page.systems[0].parts[0].measures[0]
        .time_signatures
        .push(TimeSignature {
            staff: 2,
            bounds: PixelRect::new(240, 400, 40, 120),
            shape: Shape::TimeFourFour,
            rational: TimeRational::new(4, 4),
            glyph: None,
        });

    let outcome = retriever().recover_page(&mut page, &stacked(0.9));

    assert_eq!(outcome, PageOutcome::Satisfied);
    let measure = &page.systems[0].parts[0].measures[0];
    assert!(measure.time_signature(1).is_none());
    assert_eq!(measure.time_signatures.len(), 1);
    assert_eq!(page.systems[0].glyphs.len(), 2);
}

#[test]
fn narrow_band_is_reported_without_search() {
    let mut page = one_staff_page();
    add_digits(&mut page, 200);
    page.systems[0].parts[0].measures[0].chords = vec![chord(1, 200, 240)];

    let outcome = retriever().recover_page(&mut page, &stacked(0.9));

    let PageOutcome::InsufficientSpace { roi, required } = outcome else {
        panic!("unexpected outcome {outcome:?}");
    };
    assert_eq!(roi.width(), 40);
    assert_eq!(required, 60);
    assert_eq!(page.systems[0].glyphs.len(), 2);
}

#[test]
fn weak_candidates_are_not_inserted() {
    let mut page = one_staff_page();
    add_digits(&mut page, 200);

    let outcome = retriever().recover_page(&mut page, &stacked(0.5));

    assert_eq!(outcome.recovered_count(), 0);
    assert_eq!(
        outcome.staves()[0].result,
        StaffResult::NoQualifyingCandidate
    );
    assert!(page.systems[0].parts[0].measures[0]
        .time_signatures
        .is_empty());
    assert_eq!(page.systems[0].glyphs.len(), 2);
}

#[test]
fn grade_equal_to_minimum_is_accepted() {
    let mut page = one_staff_page();
    add_digits(&mut page, 200);

    let outcome = retriever().recover_page(&mut page, &stacked(0.80));

    assert_eq!(outcome.recovered_count(), 1);
}

#[test]
fn fault_mid_pass_keeps_earlier_staves() {
    let mut page = two_staff_page();
    add_digits(&mut page, 200);
    add_digits(&mut page, 400);
    page.systems[0].parts[0].staves[1].first_line = StaffLine::horizontal(400.0, 50.0, 50.0);

    let outcome = retriever().recover_page(&mut page, &stacked(0.9));

    let PageOutcome::UnexpectedFailure { cause, staves } = &outcome else {
        panic!("unexpected outcome {outcome:?}");
    };
    assert!(cause.contains("staff 2"), "{cause}");
    assert_eq!(staves.len(), 1);
    assert_eq!(staves[0].staff, 1);
    let measure = &page.systems[0].parts[0].measures[0];
    assert!(measure.time_signature(1).is_some());
    assert!(measure.time_signature(2).is_none());
}

#[test]
fn classifier_fault_is_contained() {
    let mut page = one_staff_page();
    add_digits(&mut page, 200);

    let outcome = retriever().recover_page(&mut page, &failing);

    assert!(outcome.is_failure());
    assert_eq!(page.systems[0].glyphs.len(), 2);
}

#[test]
fn each_staff_gets_its_own_signature() {
    let mut page = two_staff_page();
    add_digits(&mut page, 200);
    add_digits(&mut page, 400);

    let outcome = retriever().recover_page(&mut page, &stacked(0.9));

    assert_eq!(outcome.recovered_count(), 2);
    let measure = &page.systems[0].parts[0].measures[0];
    assert_eq!(measure.time_signature(2).unwrap().bounds.y, 400);
}

#[test]
fn second_run_is_satisfied() {
    let mut page = one_staff_page();
    add_digits(&mut page, 200);
    let retriever = retriever();

    assert_eq!(retriever.recover_page(&mut page, &stacked(0.9)).recovered_count(), 1);
    let pool_len = page.systems[0].glyphs.len();

    assert_eq!(
        retriever.recover_page(&mut page, &stacked(0.9)),
        PageOutcome::Satisfied
    );
    assert_eq!(page.systems[0].glyphs.len(), pool_len);
}

#[test]
fn manually_assigned_glyphs_are_left_alone() {
    let mut page = one_staff_page();
    add_digits(&mut page, 200);
    let pool = &mut page.systems[0].glyphs;
    for glyph in pool.select_ids(|_| true) {
        if let Some(g) = pool.get_mut(glyph) {
            g.set_manual_shape(Shape::Clutter);
        }
    }

    let outcome = retriever().recover_page(&mut page, &stacked(0.9));

    assert_eq!(outcome.recovered_count(), 0);
    assert!(page.systems[0]
        .glyphs
        .iter()
        .all(|g| g.part_of().is_none() && g.is_manual_shape()));
}

#[test]
fn debug_box_lands_on_starting_barline() {
    let mut page = one_staff_page();
    add_digits(&mut page, 200);
    let system = &mut page.systems[0];
    let line = system.glyphs.add_rect(PixelRect::new(40, 200, 4, 120));
    if let Some(g) = system.glyphs.get_mut(line) {
        g.set_evaluation(Some(Evaluation::new(
            Shape::ThinBarline,
            0.99,
            EvaluationSource::Classifier,
        )));
    }
    system.parts[0].starting_barline = Some(Barline {
        bounds: PixelRect::new(40, 200, 4, 120),
        glyphs: vec![line],
    });

    let params = TimeSigParams {
        attach_debug_boxes: true,
        ..TimeSigParams::default()
    };
    TimeSignatureRetriever::new(params).recover_page(&mut page, &stacked(0.9));

    let attachments = page.systems[0].glyphs.get(line).unwrap().attachments();
    assert_eq!(
        attachments.get("ti1"),
        Some(&PixelRect::new(230, 215, 60, 90))
    );
}

#[test]
fn config_and_report_round_trip_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("recovery.json");
    let config = RecoveryConfig {
        time_signature: TimeSigParams {
            min_grade: 0.75,
            ..TimeSigParams::default()
        },
        log_level: Some("info".into()),
    };
    config.write_json(&config_path).unwrap();
    let loaded = RecoveryConfig::load_json(&config_path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.build_retriever().params().min_grade, 0.75);

    let mut page = one_staff_page();
    add_digits(&mut page, 200);
    let mut report = RecoveryReport::default();
    report.push(page.id, loaded.build_retriever().recover_page(&mut page, &stacked(0.9)));

    let report_path = dir.path().join("report.json");
    report.write_json(&report_path).unwrap();
    let reread = RecoveryReport::load_json(&report_path).unwrap();
    assert_eq!(reread, report);
    assert_eq!(reread.recovered_count(), 1);
}

#[test]
fn empty_staff_does_not_stop_the_next_one() {
    let mut page = two_staff_page();
    add_digits(&mut page, 400);

    let outcome = retriever().recover_page(&mut page, &stacked(0.91));

    let staves = outcome.staves();
    assert_eq!(staves.len(), 2);
    assert_eq!(staves[0].result, StaffResult::NoQualifyingCandidate);
    assert!(matches!(staves[1].result, StaffResult::Recovered { .. }));
}
