//! End-to-end checks over realistic wallet catalogs

use crate::{
    Catalog, CatalogStats, IssueKind, Localizer, TranslationStatus, TranslationText, Translator,
    TranslatorOptions, parse_catalog, validate, write_catalog,
};

const ZH_CN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="zh_CN">
<context>
    <name>AddressBookPage</name>
    <message>
        <location filename="../forms/addressbookpage.ui" line="+30"/>
        <source>Right-click to edit address or label</source>
        <translation>鼠标右击编辑地址或标签</translation>
    </message>
    <message>
        <location line="+3"/>
        <source>Create a new address</source>
        <translation>创建新地址</translation>
    </message>
    <message>
        <location line="+3"/>
        <source>&amp;New</source>
        <translation>新建(&amp;N)</translation>
    </message>
    <message>
        <location filename="../addressbookpage.cpp" line="+65"/>
        <source>Choose the address to send coins to</source>
        <translation type="unfinished"></translation>
    </message>
    <message>
        <location line="+1"/>
        <source>Exporting Failed</source>
        <translation type="unfinished">导出失败</translation>
    </message>
</context>
<context>
    <name>BitcoinGUI</name>
    <message numerus="yes">
        <location filename="../bitcoingui.cpp" line="+320"/>
        <source>%n active connection(s) to Bitcoin network</source>
        <translation>
            <numerusform>%n 个到比特币网络的活动连接</numerusform>
        </translation>
    </message>
    <message>
        <location line="+12"/>
        <source>Date: %1
</source>
        <translation>日期: %1
</translation>
    </message>
    <message>
        <location line="+7"/>
        <source>Wallet is &lt;b&gt;encrypted&lt;/b&gt; and currently &lt;b&gt;unlocked&lt;/b&gt;</source>
        <translation>钱包已被&lt;b&gt;加密&lt;/b&gt;，当前为&lt;b&gt;解锁&lt;/b&gt;状态</translation>
    </message>
    <message>
        <source>Sign messages with your Bitcoin addresses to prove you own them</source>
        <translation type="obsolete">用比特币地址签名消息以证明您拥有它们</translation>
    </message>
</context>
<context>
    <name>BitcoinUnits</name>
    <message>
        <location filename="../bitcoinunits.cpp" line="+232"/>
        <source>Amount</source>
        <comment>column title</comment>
        <translation>金额</translation>
    </message>
    <message>
        <source>Amount</source>
        <translation>数额</translation>
    </message>
</context>
</TS>
"#;

const ZH_TW: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="zh_TW">
<context>
    <name>AddressBookPage</name>
    <message>
        <source>Create a new address</source>
        <translation>產生新位址</translation>
    </message>
    <message>
        <source>&amp;Delete</source>
        <translation></translation>
    </message>
</context>
<context>
    <name>Intro</name>
    <message numerus="yes">
        <source>%n GB of free space available</source>
        <translation>
            <numerusform>可用空間尚存 %n GB</numerusform>
            <numerusform>可用空間尚存 %n GB</numerusform>
        </translation>
    </message>
</context>
<context>
    <name>Intro</name>
    <message>
        <source>Welcome</source>
        <translation>歡迎</translation>
    </message>
</context>
</TS>
"#;

fn zh_cn() -> Catalog {
    parse_catalog(ZH_CN).unwrap()
}

#[test]
fn test_parse_structure() {
    let catalog = zh_cn();
    assert_eq!(catalog.language.as_deref(), Some("zh_CN"));
    let names: Vec<&str> = catalog.contexts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["AddressBookPage", "BitcoinGUI", "BitcoinUnits"]);
    assert_eq!(catalog.len(), 11);

    let gui = catalog.context("BitcoinGUI").unwrap();
    assert_eq!(gui.messages[1].source, "Date: %1\n");
    assert_eq!(
        gui.messages[2].translation.text,
        TranslationText::Single("钱包已被<b>加密</b>，当前为<b>解锁</b>状态".to_string())
    );
    assert_eq!(gui.messages[3].translation.status, TranslationStatus::Obsolete);
}

#[test]
fn test_canonical_round_trip_is_byte_exact() {
    assert_eq!(write_catalog(&zh_cn()), ZH_CN);
    assert_eq!(write_catalog(&parse_catalog(ZH_TW).unwrap()), ZH_TW);
}

#[test]
fn test_round_trip_preserves_tuples() {
    let original = zh_cn();
    let reparsed = parse_catalog(&write_catalog(&original)).unwrap();

    let tuples = |catalog: &Catalog| -> Vec<(String, String, Vec<String>, bool)> {
        catalog
            .messages()
            .map(|(context, m)| {
                (
                    context.to_string(),
                    m.source.clone(),
                    m.translation.text.forms().to_vec(),
                    m.translation.status == TranslationStatus::Finished,
                )
            })
            .collect()
    };
    assert_eq!(tuples(&reparsed), tuples(&original));
    assert_eq!(reparsed, original);
}

#[test]
fn test_lookup_with_fallback() {
    let translator = Translator::from_catalog(&zh_cn(), TranslatorOptions::default());

    assert_eq!(translator.tr("AddressBookPage", "&New"), "新建(&N)");
    // Unfinished entries show the source, never an empty string
    assert_eq!(
        translator.tr("AddressBookPage", "Choose the address to send coins to"),
        "Choose the address to send coins to"
    );
    assert_eq!(translator.tr("AddressBookPage", "Exporting Failed"), "Exporting Failed");
    // Obsolete entries are not used
    let obsolete = "Sign messages with your Bitcoin addresses to prove you own them";
    assert_eq!(translator.tr("BitcoinGUI", obsolete), obsolete);
    // Lookup is scoped by context
    assert_eq!(translator.tr("BitcoinGUI", "&New"), "&New");

    assert_eq!(translator.tr_n("BitcoinUnits", "Amount", "column title", None), "金额");
    assert_eq!(translator.tr("BitcoinUnits", "Amount"), "数额");
    assert_eq!(
        translator.tr_n(
            "BitcoinGUI",
            "%n active connection(s) to Bitcoin network",
            "",
            Some(8)
        ),
        "%n 个到比特币网络的活动连接"
    );
}

#[test]
fn test_validation_of_good_and_bad_catalogs() {
    let report = validate(&zh_cn());
    assert!(report.is_clean(), "{:?}", report.issues);

    let report = validate(&parse_catalog(ZH_TW).unwrap());
    let kinds: Vec<IssueKind> = report.issues.iter().map(|i| i.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            IssueKind::EmptyFinishedTranslation,
            IssueKind::NumerusFormCount {
                expected: 1,
                found: 2
            },
            IssueKind::DuplicateContext,
        ]
    );
}

#[test]
fn test_stats() {
    let stats = CatalogStats::of(&zh_cn());
    assert_eq!(stats.totals.messages, 11);
    assert_eq!(stats.totals.finished, 8);
    assert_eq!(stats.totals.unfinished, 2);
    assert_eq!(stats.totals.obsolete, 1);
    assert_eq!(stats.totals.numerus, 1);
    assert!((stats.completion() - 0.8).abs() < f64::EPSILON);
}

#[test]
fn test_localizer_layers_territory_over_language() {
    let mut base = parse_catalog(ZH_TW).unwrap();
    base.language = Some("zh".to_string());
    let mut localizer = Localizer::new();
    localizer
        .install(Translator::from_catalog(&base, TranslatorOptions::default()))
        .install(Translator::from_catalog(&zh_cn(), TranslatorOptions::default()));

    assert_eq!(localizer.tr("AddressBookPage", "Create a new address"), "创建新地址");
    assert_eq!(localizer.tr("Intro", "Welcome"), "歡迎");
    assert_eq!(localizer.tr("Intro", "Quit"), "Quit");
}
