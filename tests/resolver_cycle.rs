//! A genuinely unresolvable cycle: `X`'s alias target eventually names
//! `Y`, and `Y`'s target reaches back into `X` through a member access
//! (`X::Z`), which — unlike a bare reference — raises the floor to
//! `Complete` while `X` is still only resolving to `Partial`. No forward
//! declaration can break this, so the resolver must report it rather than
//! loop or silently emit broken output.

use cxxiface::decl::builder::Library;
use cxxiface::decl::{AliasDecl, DeclKind};
use cxxiface::error::EmitError;
use cxxiface::options::Options;
use cxxiface::sink::StringWriter;

#[test]
fn alias_cycle_through_member_access_is_reported() {
    let mut lib = Library::new(Options::default());

    // `X` is declared with a placeholder target so its id exists before
    // `Y` does; patched to the real, cyclic target below.
    let void_ty = lib.exprs_mut().void();
    let x = lib.declare_alias(
        "X",
        None,
        AliasDecl {
            target: void_ty,
            template: Default::default(),
            is_using_decl: false,
        },
    );

    let x_ty = lib.exprs_mut().declared(x);
    let y_target = lib.exprs_mut().member_of(x_ty, "Z");
    let y = lib.declare_alias(
        "Y",
        None,
        AliasDecl {
            target: y_target,
            template: Default::default(),
            is_using_decl: false,
        },
    );

    let y_ty = lib.exprs_mut().declared(y);
    match &mut lib.decls_mut().get_mut(x).kind {
        DeclKind::Alias(a) => a.target = y_ty,
        _ => unreachable!(),
    }

    let mut writer = StringWriter::new(true);
    let result = lib.emit(&[x], "CYCLE_H", &mut writer);

    match result {
        Err(EmitError::Cycle(e)) => {
            assert!(e.chain.len() >= 2);
            assert_eq!(e.root_path, "X");
            let msg = e.to_string();
            assert!(msg.contains("dependency cycle detected"));
        }
        other => panic!("expected a cycle error, got {other:?}"),
    }
}

#[test]
fn ignore_errors_downgrades_cycle_to_a_logged_continue() {
    let options = Options {
        ignore_errors: true,
        ..Options::default()
    };
    let mut lib = Library::new(options);

    let void_ty = lib.exprs_mut().void();
    let x = lib.declare_alias(
        "X",
        None,
        AliasDecl {
            target: void_ty,
            template: Default::default(),
            is_using_decl: false,
        },
    );
    let x_ty = lib.exprs_mut().declared(x);
    let y_target = lib.exprs_mut().member_of(x_ty, "Z");
    let y = lib.declare_alias(
        "Y",
        None,
        AliasDecl {
            target: y_target,
            template: Default::default(),
            is_using_decl: false,
        },
    );
    let y_ty = lib.exprs_mut().declared(y);
    match &mut lib.decls_mut().get_mut(x).kind {
        DeclKind::Alias(a) => a.target = y_ty,
        _ => unreachable!(),
    }

    let mut writer = StringWriter::new(true);
    let result = lib.emit(&[x], "CYCLE_H", &mut writer);

    assert!(result.is_ok());
}
