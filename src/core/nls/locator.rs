//! Locates `localize(...)` / `localize2(...)` calls that go through an import of the
//! localization module.
//!
//! Three import styles are recognized:
//!
//! ```typescript
//! import * as nls from '../../nls';          // namespace: nls.localize('key', 'msg')
//! import nls = require('vs/nls');             // legacy namespace, same call shape
//! import { localize as l } from './nls.js';   // named: l('key', 'msg')
//! ```
//!
//! The locator is purely syntactic. A local binding that reuses the imported name
//! (parameter, variable, function, class or catch binding) hides the import inside the
//! scope that declares it: `var` hoists to the enclosing function, everything else stays
//! in its block.

use std::collections::{BTreeMap, HashSet};

use swc_common::Spanned;
use swc_ecma_ast::{
    BlockStmt, CallExpr, Callee, CatchClause, ClassDecl, Constructor, Expr, FnDecl, ForInStmt,
    ForOfStmt, ForStmt, Function, ImportDecl, ImportSpecifier, MemberProp, ModuleDecl,
    ModuleExportName, ModuleItem, ParamOrTsParamProp, Pat, Program, TsImportEqualsDecl,
    TsModuleRef, TsParamPropParam, VarDecl, VarDeclKind,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::entry::LocalizeFn;
use super::text_model::{LineIndex, TextSpan};
use crate::core::parsers::source::ParsedSource;

/// A located call: key and message argument ranges plus their source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub key_span: TextSpan,
    pub key: String,
    pub value_span: TextSpan,
    pub value: String,
}

/// Local names through which the target function is reachable.
#[derive(Debug, Default)]
struct NlsBindings {
    /// `nls` in `import * as nls` / `import nls = require(...)`.
    namespaces: HashSet<String>,
    /// `l` in `import { localize as l }`.
    named: HashSet<String>,
}

impl NlsBindings {
    fn is_empty(&self) -> bool {
        self.namespaces.is_empty() && self.named.is_empty()
    }

    fn contains(&self, name: &str) -> bool {
        self.namespaces.contains(name) || self.named.contains(name)
    }
}

/// Whether an import specifier points at the localization module
/// (`vs/nls`, `../nls`, `./nls.js`, ...).
pub fn is_nls_module(specifier: &str) -> bool {
    let last = specifier.rsplit('/').next().unwrap_or(specifier);
    let last = last.strip_suffix(".js").unwrap_or(last);
    last == "nls"
}

/// Find every call to `target` in textual order of the key argument.
///
/// Files without a qualifying import, and calls with fewer than two arguments,
/// contribute nothing.
pub fn find_localize_calls(parsed: &ParsedSource, target: LocalizeFn) -> Vec<CallSite> {
    let bindings = collect_nls_bindings(&parsed.program, target);
    if bindings.is_empty() {
        return Vec::new();
    }

    let mut finder = CallFinder {
        parsed,
        line_index: LineIndex::new(parsed.code()),
        target,
        bindings,
        scopes: Vec::new(),
        calls: BTreeMap::new(),
    };
    parsed.program.visit_with(&mut finder);

    finder.calls.into_values().collect()
}

fn collect_nls_bindings(program: &Program, target: LocalizeFn) -> NlsBindings {
    let mut bindings = NlsBindings::default();
    let Program::Module(module) = program else {
        return bindings;
    };

    for item in &module.body {
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                collect_import(import, target, &mut bindings);
            }
            ModuleItem::ModuleDecl(ModuleDecl::TsImportEquals(import)) => {
                collect_import_equals(import, &mut bindings);
            }
            _ => {}
        }
    }

    bindings
}

fn collect_import(node: &ImportDecl, target: LocalizeFn, bindings: &mut NlsBindings) {
    if node.type_only {
        return;
    }
    let Some(module_path) = node.src.value.as_str() else {
        return;
    };
    if !is_nls_module(module_path) {
        return;
    }

    for specifier in &node.specifiers {
        match specifier {
            ImportSpecifier::Namespace(ns) => {
                bindings.namespaces.insert(ns.local.sym.to_string());
            }
            ImportSpecifier::Named(named) if !named.is_type_only => {
                let imported_name = match &named.imported {
                    Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                    Some(ModuleExportName::Str(s)) => s.value.to_string_lossy().to_string(),
                    None => named.local.sym.to_string(),
                };
                if imported_name == target.name() {
                    bindings.named.insert(named.local.sym.to_string());
                }
            }
            _ => {}
        }
    }
}

fn collect_import_equals(node: &TsImportEqualsDecl, bindings: &mut NlsBindings) {
    if node.is_type_only {
        return;
    }
    if let TsModuleRef::TsExternalModuleRef(external) = &node.module_ref
        && let Some(module_path) = external.expr.value.as_str()
        && is_nls_module(module_path)
    {
        bindings.namespaces.insert(node.id.sym.to_string());
    }
}

/// Collect binding names introduced by a pattern.
fn binding_names(pat: &Pat, out: &mut Vec<String>) {
    match pat {
        Pat::Ident(ident) => out.push(ident.id.sym.to_string()),
        Pat::Object(obj) => {
            for prop in &obj.props {
                match prop {
                    swc_ecma_ast::ObjectPatProp::KeyValue(kv) => binding_names(&kv.value, out),
                    swc_ecma_ast::ObjectPatProp::Assign(assign) => {
                        out.push(assign.key.sym.to_string())
                    }
                    swc_ecma_ast::ObjectPatProp::Rest(rest) => binding_names(&rest.arg, out),
                }
            }
        }
        Pat::Array(arr) => {
            for elem in arr.elems.iter().flatten() {
                binding_names(elem, out);
            }
        }
        Pat::Assign(assign) => binding_names(&assign.left, out),
        Pat::Rest(rest) => binding_names(&rest.arg, out),
        _ => {}
    }
}

/// Local names hiding an nls binding, for one function or block.
#[derive(Debug, Default)]
struct Scope {
    names: HashSet<String>,
    /// Function scopes receive hoisted `var` declarations.
    function: bool,
}

struct CallFinder<'a> {
    parsed: &'a ParsedSource,
    line_index: LineIndex,
    target: LocalizeFn,
    bindings: NlsBindings,
    scopes: Vec<Scope>,
    /// Keyed by the key argument's start offset: deduplicates and orders in one go.
    calls: BTreeMap<usize, CallSite>,
}

impl CallFinder<'_> {
    fn is_shadowed(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.names.contains(name))
    }

    /// Record local declarations in the innermost scope, or in the nearest function
    /// scope for `var`. Module-level declarations cannot reuse an imported name, so
    /// they are ignored.
    fn declare(&mut self, names: impl IntoIterator<Item = String>, hoisted: bool) {
        let scope = if hoisted {
            self.scopes.iter_mut().rev().find(|scope| scope.function)
        } else {
            self.scopes.last_mut()
        };
        let Some(scope) = scope else {
            return;
        };
        for name in names {
            if self.bindings.contains(&name) {
                scope.names.insert(name);
            }
        }
    }

    fn with_scope<F>(&mut self, function: bool, names: Vec<String>, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.scopes.push(Scope {
            names: HashSet::new(),
            function,
        });
        self.declare(names, false);
        f(self);
        self.scopes.pop();
    }

    /// Whether `callee` resolves to the target function through an nls binding.
    fn is_target_callee(&self, callee: &Expr) -> bool {
        match callee {
            Expr::Paren(paren) => self.is_target_callee(&paren.expr),
            // `(0, nls.localize)(...)`
            Expr::Seq(seq) => seq
                .exprs
                .last()
                .is_some_and(|last| self.is_target_callee(last)),
            Expr::Member(member) => {
                if let Expr::Ident(obj) = &*member.obj
                    && let MemberProp::Ident(prop) = &member.prop
                {
                    let alias = obj.sym.as_str();
                    prop.sym.as_str() == self.target.name()
                        && self.bindings.namespaces.contains(alias)
                        && !self.is_shadowed(alias)
                } else {
                    false
                }
            }
            Expr::Ident(ident) => {
                let name = ident.sym.as_str();
                self.bindings.named.contains(name) && !self.is_shadowed(name)
            }
            _ => false,
        }
    }

    fn record(&mut self, call: &CallExpr) {
        let [key_arg, value_arg, ..] = call.args.as_slice() else {
            return;
        };
        if key_arg.spread.is_some() || value_arg.spread.is_some() {
            return;
        }

        let (key_start, key_end) = self.parsed.range(key_arg.expr.span());
        let (value_start, value_end) = self.parsed.range(value_arg.expr.span());

        let site = CallSite {
            key_span: TextSpan::new(
                self.line_index.position(key_start),
                self.line_index.position(key_end),
            ),
            key: self.parsed.slice(key_arg.expr.span()).to_string(),
            value_span: TextSpan::new(
                self.line_index.position(value_start),
                self.line_index.position(value_end),
            ),
            value: self.parsed.slice(value_arg.expr.span()).to_string(),
        };
        self.calls.entry(key_start).or_insert(site);
    }
}

impl Visit for CallFinder<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Callee::Expr(callee) = &node.callee
            && self.is_target_callee(callee)
        {
            self.record(node);
        }
        node.visit_children_with(self);
    }

    fn visit_function(&mut self, node: &Function) {
        let mut names = Vec::new();
        for param in &node.params {
            binding_names(&param.pat, &mut names);
        }
        self.with_scope(true, names, |this| node.visit_children_with(this));
    }

    fn visit_arrow_expr(&mut self, node: &swc_ecma_ast::ArrowExpr) {
        let mut names = Vec::new();
        for param in &node.params {
            binding_names(param, &mut names);
        }
        self.with_scope(true, names, |this| node.visit_children_with(this));
    }

    fn visit_constructor(&mut self, node: &Constructor) {
        let mut names = Vec::new();
        for param in &node.params {
            match param {
                ParamOrTsParamProp::Param(p) => binding_names(&p.pat, &mut names),
                ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                    TsParamPropParam::Ident(ident) => names.push(ident.id.sym.to_string()),
                    TsParamPropParam::Assign(assign) => binding_names(&assign.left, &mut names),
                },
            }
        }
        self.with_scope(true, names, |this| node.visit_children_with(this));
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        let mut names = Vec::new();
        if let Some(param) = &node.param {
            binding_names(param, &mut names);
        }
        self.with_scope(false, names, |this| node.visit_children_with(this));
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        self.with_scope(false, Vec::new(), |this| node.visit_children_with(this));
    }

    // Loop heads get their own scope so `for (let x ...)` stays inside the loop.
    fn visit_for_stmt(&mut self, node: &ForStmt) {
        self.with_scope(false, Vec::new(), |this| node.visit_children_with(this));
    }

    fn visit_for_in_stmt(&mut self, node: &ForInStmt) {
        self.with_scope(false, Vec::new(), |this| node.visit_children_with(this));
    }

    fn visit_for_of_stmt(&mut self, node: &ForOfStmt) {
        self.with_scope(false, Vec::new(), |this| node.visit_children_with(this));
    }

    fn visit_var_decl(&mut self, node: &VarDecl) {
        let mut names = Vec::new();
        for decl in &node.decls {
            binding_names(&decl.name, &mut names);
        }
        self.declare(names, node.kind == VarDeclKind::Var);
        node.visit_children_with(self);
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.declare([node.ident.sym.to_string()], false);
        node.function.visit_with(self);
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.declare([node.ident.sym.to_string()], false);
        node.class.visit_with(self);
    }
}
