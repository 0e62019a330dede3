use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::CliTest;

const GREETINGS: &str = r#"
from pie import i18n

_ = i18n.Translator("modules/base").translate


class Greetings:
    async def hello(self, ctx):
        await ctx.reply(_(ctx, "Hello!"))

    async def welcome(self, ctx, name: str):
        await ctx.reply(_(ctx, "Welcome, {name}!").format(name=name))
"#;

fn greetings_project() -> Result<CliTest> {
    let test = CliTest::project()?;
    test.write_file("modules/base/greetings/module.py", GREETINGS)?;
    Ok(test)
}

#[test]
fn test_catalogs_are_created() -> Result<()> {
    let test = greetings_project()?;

    assert_cmd_snapshot!(test.command().arg("modules/base"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Info: Found 2 strings in 'modules/base'.
    Info: Saving 0 translated strings to 'modules/base/po/cs.popie'.
    Info: Saving 0 translated strings to 'modules/base/po/sk.popie'.
    PoPie: 2 files have been updated.

    ----- stderr -----
    ");
    assert_eq!(
        test.read_file("modules/base/po/cs.popie")?,
        "msgid Hello!\nmsgstr\n\nmsgid Welcome, {name}!\nmsgstr\n"
    );
    assert_eq!(
        test.read_file("modules/base/po/sk.popie")?,
        test.read_file("modules/base/po/cs.popie")?
    );

    Ok(())
}

#[test]
fn test_second_run_changes_nothing() -> Result<()> {
    let test = greetings_project()?;
    test.command().arg("modules/base").status()?;

    assert_cmd_snapshot!(test.command().args(["--strict", "modules/base"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Info: Found 2 strings in 'modules/base'.
    Info: Saving 0 translated strings to 'modules/base/po/cs.popie'.
    Info: Saving 0 translated strings to 'modules/base/po/sk.popie'.
    PoPie: 0 files have been updated.

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_translations_are_kept() -> Result<()> {
    let test = greetings_project()?;
    test.write_file(
        "modules/base/po/cs.popie",
        "msgid Welcome, {name}!\nmsgstr Vítej, {name}!\n\nmsgid Removed\nmsgstr Odstraněno\n",
    )?;

    assert_cmd_snapshot!(
        test.command().args(["-l", "cs", "modules/base/greetings/module.py"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Info: Found 2 strings in 'modules/base'.
    Info: Saving 1 translated strings to 'modules/base/po/cs.popie'.
    PoPie: 1 files have been updated.

    ----- stderr -----
    "
    );
    assert_eq!(
        test.read_file("modules/base/po/cs.popie")?,
        "msgid Hello!\nmsgstr\n\nmsgid Welcome, {name}!\nmsgstr Vítej, {name}!\n"
    );
    assert!(!test.root().join("modules/base/po/sk.popie").exists());

    Ok(())
}

#[test]
fn test_strict_mode_fails_on_change() -> Result<()> {
    let test = greetings_project()?;

    assert_cmd_snapshot!(test.command().args(["--strict", "modules/base"]), @r"
    success: false
    exit_code: 70
    ----- stdout -----
    Info: Found 2 strings in 'modules/base'.
    Info: Saving 0 translated strings to 'modules/base/po/cs.popie'.
    Info: Saving 0 translated strings to 'modules/base/po/sk.popie'.
    PoPie: 2 files updated in strict mode.

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_analyzer_errors_block_update() -> Result<()> {
    let test = CliTest::project()?;
    test.write_file(
        "pie/utils.py",
        "def greet(ctx, text):\n    return _(ctx, text)\n",
    )?;

    assert_cmd_snapshot!(test.command().arg("pie"), @r"
    success: false
    exit_code: 70
    ----- stdout -----
    Analyzer error: pie/utils.py:2:11 Bad string argument (has to be literal, not variable).
    Error: Directory 'pie' contains 1 errors, .popie files will not be updated.
    PoPie: 1 errors found.

    ----- stderr -----
    ");
    assert!(!test.root().join("pie/po").exists());

    Ok(())
}

#[test]
fn test_deprecated_context_is_a_warning() -> Result<()> {
    let test = CliTest::project()?;
    test.write_file("pie/utils.py", "def greet(tc):\n    return _(tc, \"Hi\")\n")?;

    assert_cmd_snapshot!(test.command().args(["-l", "cs", "pie"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Analyzer warning: pie/utils.py:2:11 Translation context variable name 'tc' is deprecated, use 'utx' instead. 'tc' may not be accepted in the future.
    Info: Found 1 strings in 'pie'.
    Info: Saving 0 translated strings to 'pie/po/cs.popie'.
    PoPie: 1 files have been updated.

    ----- stderr -----
    ");
    assert_eq!(test.read_file("pie/po/cs.popie")?, "msgid Hi\nmsgstr\n");

    Ok(())
}

#[test]
fn test_bad_translation_variables() -> Result<()> {
    let test = greetings_project()?;
    test.write_file(
        "modules/base/po/cs.popie",
        "msgid Welcome, {name}!\nmsgstr Vítej, {jméno}!\n",
    )?;

    assert_cmd_snapshot!(test.command().args(["-l", "cs", "modules/base"]), @r"
    success: false
    exit_code: 70
    ----- stdout -----
    Info: Found 2 strings in 'modules/base'.
    Error: Translation for 'Welcome, {name}!' contains bad variables: jméno.
    Info: Saving 1 translated strings to 'modules/base/po/cs.popie'.
    PoPie: 1 errors found.

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_diff_is_printed() -> Result<()> {
    let test = greetings_project()?;
    test.write_file("modules/base/po/cs.popie", "msgid Hello!\nmsgstr Ahoj!\n")?;

    assert_cmd_snapshot!(test.command().args(["--diff", "-l", "cs", "modules/base"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Info: Found 2 strings in 'modules/base'.
    --- modules/base/po/cs.popie
    +++ modules/base/po/cs.popie
    @@ -1,2 +1,5 @@
     msgid Hello!
     msgstr Ahoj!
    +
    +msgid Welcome, {name}!
    +msgstr
    Info: Saving 1 translated strings to 'modules/base/po/cs.popie'.
    PoPie: 1 files have been updated.

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_ignored_path() -> Result<()> {
    let test = CliTest::project()?;
    test.write_file("tests/test_utils.py", "x = _(ctx, \"Hi\")\n")?;

    assert_cmd_snapshot!(test.command().arg("tests"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Warning: Ignoring 'tests': directory criteria not matched (could not find 'strawberry.py' script).
    PoPie: 0 files have been updated.

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_detached_mode() -> Result<()> {
    let test = CliTest::new()?;
    test.create_dir(".git")?;
    test.write_file("greetings/module.py", GREETINGS)?;

    assert_cmd_snapshot!(test.command().args(["--detached", "-l", "sk", "greetings"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Info: Found 2 strings in '.'.
    Info: Saving 0 translated strings to 'po/sk.popie'.
    PoPie: 1 files have been updated.

    ----- stderr -----
    ");
    assert_eq!(
        test.read_file("po/sk.popie")?,
        "msgid Hello!\nmsgstr\n\nmsgid Welcome, {name}!\nmsgstr\n"
    );

    Ok(())
}

#[test]
fn test_missing_path() -> Result<()> {
    let test = CliTest::project()?;

    assert_cmd_snapshot!(test.command().arg("nowhere"), @r"
    success: false
    exit_code: 64
    ----- stdout -----

    ----- stderr -----
    Error: Specified path 'nowhere' does not exist.
    ");

    Ok(())
}

#[test]
fn test_missing_root() -> Result<()> {
    let test = CliTest::new()?;
    test.create_dir("pie")?;

    assert_cmd_snapshot!(test.command().arg("pie"), @r"
    success: false
    exit_code: 64
    ----- stdout -----

    ----- stderr -----
    Error: Could not find project root for 'pie'.
    ");

    Ok(())
}

#[test]
fn test_multiple_roots() -> Result<()> {
    let test = greetings_project()?;
    test.write_file("modules/base/strawberry.py", "")?;
    test.write_file("pie/utils.py", "")?;

    assert_cmd_snapshot!(test.command().args(["pie", "modules/base/greetings"]), @r"
    success: false
    exit_code: 70
    ----- stdout -----

    ----- stderr -----
    Error: Multiple project roots detected:
    - modules/base
    - .
    ");

    Ok(())
}

#[test]
fn test_unparsable_source() -> Result<()> {
    let test = CliTest::project()?;
    test.write_file("pie/broken.py", "def broken(:\n    pass\n")?;

    insta::with_settings!({filters => vec![(r"broken\.py:\d+:\d+", "broken.py:[POSITION]")]}, {
        assert_cmd_snapshot!(test.command().arg("pie"), @r"
        success: false
        exit_code: 64
        ----- stdout -----

        ----- stderr -----
        Error: Failed to parse Python file: pie/broken.py:[POSITION] (invalid syntax)
        ");
    });
    assert!(!test.root().join("pie/po").exists());

    Ok(())
}

#[test]
fn test_config_languages() -> Result<()> {
    let test = greetings_project()?;
    test.write_file(".popierc.json", r#"{ "languages": ["de"] }"#)?;

    assert_cmd_snapshot!(test.command().arg("modules/base"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Info: Found 2 strings in 'modules/base'.
    Info: Saving 0 translated strings to 'modules/base/po/de.popie'.
    PoPie: 1 files have been updated.

    ----- stderr -----
    ");
    assert!(!test.root().join("modules/base/po/cs.popie").exists());

    Ok(())
}
