use l10n_format::{args, sprintf};
use l10n_plural::{parse_rules, resolve, Operator, Rule, RuleSet};

#[test]
fn item_count_rules_pick_plural_template() {
    let rules = parse_rules([
        "[1]=1",
        "you have one item",
        "[1]>1",
        "you have %[1]d items",
    ]);
    assert_eq!(rules.len(), 2);

    let args = args![5];
    let resolved = resolve("ignored", &args, Some(&rules)).expect("resolve");
    assert_eq!(resolved.template, "you have %[1]d items");
    assert_eq!(resolved.args, &args![5][..]);
    assert_eq!(sprintf(resolved.template, resolved.args), "you have 5 items");

    let args = args![1];
    let resolved = resolve("ignored", &args, Some(&rules)).expect("resolve");
    assert_eq!(resolved.template, "you have one item");
    assert!(resolved.args.is_empty());
    assert_eq!(sprintf(resolved.template, resolved.args), "you have one item");
}

#[test]
fn verb_prefixed_expressions_parse_like_bare_ones() {
    let bare = parse_rules(["[1]=1", "one", "[1]>1", "many"]);
    let prefixed = parse_rules(["%[1]d=1", "one", "%[1]d>1", "many"]);
    assert_eq!(bare, prefixed);
    assert_eq!(
        prefixed.rules()[1],
        Rule::new(1, Operator::Gt, 1, "many")
    );
}

#[test]
fn only_malformed_pairs_behave_as_empty_rule_set() {
    let rules = parse_rules(["pos1=1", "one", "[1]<3", "few", "(1)>1", "many"]);
    assert!(rules.is_empty());

    let args = args![3, "extra"];
    let resolved = resolve("%d files", &args, Some(&rules)).expect("resolve");
    assert_eq!(resolved.template, "%d files");
    assert_eq!(resolved.args, &args![3][..]);
}

#[test]
fn trimming_takes_leading_arguments_regardless_of_length() {
    let rules = RuleSet::from_pairs([("%[1]d>0", "%s")]);
    let args = args![2, "b", "c", "d", "e"];
    let resolved = resolve("orig", &args, Some(&rules)).expect("resolve");
    assert_eq!(resolved.args.len(), 1);
    assert_eq!(resolved.args[0], args[0]);
}

#[test]
fn short_argument_list_surfaces_as_printer_marker() {
    let rules = RuleSet::from_pairs([("[1]>1", "%d of %d")]);
    let args = args![4];
    let resolved = resolve("orig", &args, Some(&rules)).expect("resolve");
    assert_eq!(
        sprintf(resolved.template, resolved.args),
        "4 of %!d(MISSING)"
    );
}

#[test]
fn dangling_expression_keeps_earlier_rules() {
    let rules = parse_rules(["[1]=0", "none", "[1]>0"]);
    assert_eq!(rules.rules(), &[Rule::new(1, Operator::Eq, 0, "none")]);
}
