use affixchk::dict::manager;
use affixchk::{Config, Dictionary, DictionaryError, SpellChecker, SuggestionEngine};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const EN_AFF: &str = "\
# tiny English grammar
SET UTF-8
TRY esianrtolcdugmphb
REP 2
REP ph f
REP alot a_lot
SFX S Y 3
SFX S y ies [^aeiou]y
SFX S 0 s [aeiou]y
SFX S 0 s [^y]
PFX U Y 1
PFX U 0 un .
";

const EN_DIC: &str = "\
8
cat/S
city/S
day/S
fone
lock/U
that
a
lot
";

fn install(dir: &Path, stem: &str) {
    fs::write(dir.join(format!("{}.aff", stem)), EN_AFF).unwrap();
    fs::write(dir.join(format!("{}.dic", stem)), EN_DIC).unwrap();
}

fn config_for(dir: &Path) -> Config {
    Config {
        language: "en_US".to_string(),
        dictionary_dir: dir.to_path_buf(),
        ..Config::default()
    }
}

#[test]
fn test_checker_loads_installed_pair() {
    let dir = tempdir().unwrap();
    install(dir.path(), "en_US");

    let checker = SpellChecker::new(&config_for(dir.path())).unwrap();
    assert_eq!(checker.dictionary().name(), "en_US");
    assert_eq!(checker.dictionary().len(), 8);

    assert!(checker.is_correct("cats"));
    assert!(checker.is_correct("days"));
    assert!(checker.is_correct("unlock"));
    assert!(!checker.is_correct("citys"));
}

#[test]
fn test_nested_dictionary_with_dashed_language() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("hunspell").join("en");
    fs::create_dir_all(&nested).unwrap();
    install(&nested, "en-us");

    let listed = manager::list_dictionaries(dir.path());
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].language, "en-US");

    let checker = SpellChecker::new(&config_for(dir.path())).unwrap();
    assert!(checker.is_correct("lot"));
}

#[test]
fn test_missing_dictionary() {
    let dir = tempdir().unwrap();
    install(dir.path(), "de_DE");

    match SpellChecker::new(&config_for(dir.path())) {
        Err(DictionaryError::NotFound { language, .. }) => assert_eq!(language, "en_US"),
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_broken_grammar_on_disk() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("en_US.aff"), "SFX S Y 2\nSFX S 0 s .\n").unwrap();
    fs::write(dir.path().join("en_US.dic"), "1\ncat/S\n").unwrap();

    let err = SpellChecker::new(&config_for(dir.path())).unwrap_err();
    assert!(matches!(err, DictionaryError::Grammar(_)));
    assert!(err.to_string().contains("en_US.aff"));
}

#[test]
fn test_engine_examples() {
    let dictionary = Dictionary::from_parts(EN_AFF, EN_DIC, "en_US").unwrap();
    let engine = SuggestionEngine::new(&dictionary);

    assert!(engine.suggest("cats").is_empty());
    assert!(engine.suggest("unlock").is_empty());
    assert!(engine.suggest("phone").contains(&"fone".to_string()));
    assert!(engine.suggest("tha").contains(&"that".to_string()));
    assert!(engine.suggest("alot").contains(&"a lot".to_string()));
    assert_eq!(engine.suggest("qqqq"), vec!["qqqq"]);
}

#[test]
fn test_check_text_reports_positions() {
    let dictionary = Dictionary::from_parts(EN_AFF, EN_DIC, "en_US").unwrap();
    let checker = SpellChecker::with_dictionary(dictionary, &Config::default());

    let result = checker.check_text("Cats and\nDays, see https://example.org/citys");
    let found: Vec<_> = result
        .errors
        .iter()
        .map(|e| (e.word.as_str(), e.line, e.column))
        .collect();
    assert_eq!(found, vec![("and", 1, 6), ("see", 2, 7)]);
}
