use super::*;

#[test]
fn whitespace_runs_become_single_underscores() {
    assert_eq!(file_name("Ocean  Breeze\tDark", ExportKind::Raster), "Ocean_Breeze_Dark.pdf");
    assert_eq!(file_name(" Corporate ", ExportKind::Native), "_Corporate_.pptx");
}

#[test]
fn empty_names_fall_back() {
    assert_eq!(file_name("", ExportKind::Raster), "presentation.pdf");
    assert_eq!(file_name("", ExportKind::Native), "presentation.pptx");
}

#[test]
fn path_characters_cannot_escape_the_output_directory() {
    let name = file_name("../../etc/Evil Theme", ExportKind::Raster);
    assert_eq!(name, ".._.._etc_Evil_Theme.pdf");
    assert!(!name.contains('/'));

    assert_eq!(file_name(r"C:\deck\Q3: plan?", ExportKind::Native), "C_deck_Q3_plan_.pptx");
    assert_eq!(file_name("Bold/ Move", ExportKind::Raster), "Bold_Move.pdf");
    assert_eq!(file_name("a\u{0}b", ExportKind::Raster), "a_b.pdf");
}
