//! Arena-backed token storage.
//!
//! Tokens live in a [`TokenList`] arena and are addressed by [`TokenId`],
//! the same storage scheme the rest of the crate uses for descriptor
//! tables. Navigation happens through the [`Tok`] cursor, which borrows the
//! list and exposes the sibling/bracket/AST links the catalog queries need.

use smol_str::SmolStr;

/// Index of a token inside its [`TokenList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(pub(crate) u32);

/// Index of a scope inside its [`TokenList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub(crate) u32);

/// Lexical classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Name,
    Number,
    StringLiteral,
    CharLiteral,
    Op,
}

/// Scope classification, reduced to what name resolution consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Namespace,
    Class,
    Struct,
    Function,
    Other,
}

/// A lexical scope with its enclosing chain and base classes.
#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub nested_in: Option<ScopeId>,
    /// Qualified base-class names, namespaces included (`"ns::Base"`).
    pub base_classes: Vec<String>,
}

impl Scope {
    pub fn is_class_or_struct(&self) -> bool {
        matches!(self.kind, ScopeKind::Class | ScopeKind::Struct)
    }
}

/// Frontend symbol information for a resolved variable.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Canonical type name, `"std::string"` style.
    pub type_name: String,
    pub is_pointer: bool,
    /// The declaration carries a noreturn attribute (function pointers).
    pub attr_noreturn: bool,
}

/// Frontend symbol information for a resolved function.
#[derive(Debug, Clone, Copy)]
pub struct FunctionBinding {
    /// Declared directly in the global scope.
    pub in_global_scope: bool,
    pub is_const: bool,
    pub attr_noreturn: bool,
}

#[derive(Debug, Clone)]
struct TokenData {
    text: SmolStr,
    kind: TokenKind,
    keyword: bool,
    standard_type: bool,
    next: Option<TokenId>,
    prev: Option<TokenId>,
    link: Option<TokenId>,
    ast_parent: Option<TokenId>,
    ast_op1: Option<TokenId>,
    ast_op2: Option<TokenId>,
    /// 0 = not a variable.
    var_id: u32,
    /// Pre-simplification spelling, `"->"` for member tokens folded to `"."`.
    original_name: Option<SmolStr>,
    scope: Option<ScopeId>,
    function: Option<FunctionBinding>,
}

/// Token arena plus the symbol side tables the frontend attaches.
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    tokens: Vec<TokenData>,
    scopes: Vec<Scope>,
    variables: Vec<Variable>,
}

// C/C++ keywords that can occur in a call position.
const KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "break", "continue",
    "return", "goto", "sizeof", "typedef", "struct", "class", "union", "enum", "const",
    "static", "extern", "new", "delete", "throw", "try", "catch", "using", "namespace",
    "template", "typename", "operator", "this", "nullptr", "true", "false", "static_cast",
    "dynamic_cast", "const_cast", "reinterpret_cast", "decltype", "noexcept", "constexpr",
];

const STANDARD_TYPES: &[&str] = &[
    "void", "bool", "char", "short", "int", "long", "float", "double", "signed", "unsigned",
    "wchar_t",
];

const TWO_CHAR_OPS: &[&str] = &[
    "::", "->", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "++", "--", "+=", "-=", "*=",
    "/=", "%=", "&=", "|=", "^=",
];

impl TokenList {
    /// Build a token list from pre-simplified source text.
    ///
    /// Brackets `()[]{}` are linked; `<`/`>` are linked when they enclose a
    /// balanced template argument list. `->` is folded to `.` with the
    /// original spelling kept, matching the simplified stream the catalog
    /// is queried with. A global scope is created and every token starts
    /// out in it.
    pub fn parse(code: &str) -> Self {
        let mut list = TokenList {
            tokens: Vec::new(),
            scopes: vec![Scope {
                kind: ScopeKind::Global,
                nested_in: None,
                base_classes: Vec::new(),
            }],
            variables: Vec::new(),
        };
        for raw in lex(code) {
            list.push(raw);
        }
        list.link_brackets();
        list.link_angle_brackets();
        list
    }

    fn push(&mut self, text: SmolStr) {
        let kind = classify(&text);
        let (text, original_name) = if text == "->" {
            (SmolStr::new("."), Some(SmolStr::new("->")))
        } else {
            (text, None)
        };
        let id = TokenId(self.tokens.len() as u32);
        let prev = id.0.checked_sub(1).map(TokenId);
        if let Some(p) = prev {
            self.tokens[p.0 as usize].next = Some(id);
        }
        self.tokens.push(TokenData {
            keyword: kind == TokenKind::Name && KEYWORDS.contains(&text.as_str()),
            standard_type: kind == TokenKind::Name && STANDARD_TYPES.contains(&text.as_str()),
            text,
            kind,
            next: None,
            prev,
            link: None,
            ast_parent: None,
            ast_op1: None,
            ast_op2: None,
            var_id: 0,
            original_name,
            scope: Some(ScopeId(0)),
            function: None,
        });
    }

    fn link_brackets(&mut self) {
        let mut stack: Vec<(usize, &'static str)> = Vec::new();
        for i in 0..self.tokens.len() {
            let close = match self.tokens[i].text.as_str() {
                "(" => {
                    stack.push((i, ")"));
                    continue;
                }
                "[" => {
                    stack.push((i, "]"));
                    continue;
                }
                "{" => {
                    stack.push((i, "}"));
                    continue;
                }
                c @ (")" | "]" | "}") => c,
                _ => continue,
            };
            if let Some(&(open, expected)) = stack.last() {
                if expected == close {
                    stack.pop();
                    self.tokens[open].link = Some(TokenId(i as u32));
                    self.tokens[i].link = Some(TokenId(open as u32));
                }
            }
        }
    }

    // Template angle brackets: `<` after a name opens a candidate; `;`,
    // `{`, `}` and unbalanced round brackets discard the whole stack.
    fn link_angle_brackets(&mut self) {
        let mut stack: Vec<usize> = Vec::new();
        for i in 0..self.tokens.len() {
            match self.tokens[i].text.as_str() {
                "<" => {
                    let after_name = i > 0 && self.tokens[i - 1].kind == TokenKind::Name;
                    if after_name {
                        stack.push(i);
                    }
                }
                ">" => {
                    if let Some(open) = stack.pop() {
                        self.tokens[open].link = Some(TokenId(i as u32));
                        self.tokens[i].link = Some(TokenId(open as u32));
                    }
                }
                ";" | "{" | "}" | ")" => stack.clear(),
                _ => {}
            }
        }
    }

    /// First token of the list, if any.
    pub fn front(&self) -> Option<Tok<'_>> {
        (!self.tokens.is_empty()).then(|| self.at(TokenId(0)))
    }

    /// Cursor over `id`.
    pub fn at(&self, id: TokenId) -> Tok<'_> {
        debug_assert!((id.0 as usize) < self.tokens.len());
        Tok { list: self, id }
    }

    /// First token whose text equals `text`.
    pub fn find(&self, text: &str) -> Option<Tok<'_>> {
        self.tokens
            .iter()
            .position(|t| t.text == text)
            .map(|i| self.at(TokenId(i as u32)))
    }

    /// `n`-th token whose text equals `text` (0-based).
    pub fn find_nth(&self, text: &str, n: usize) -> Option<Tok<'_>> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.text == text)
            .nth(n)
            .map(|(i, _)| self.at(TokenId(i as u32)))
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn variable(&self, var_id: u32) -> Option<&Variable> {
        var_id
            .checked_sub(1)
            .and_then(|i| self.variables.get(i as usize))
    }

    // ------------------------------------------------------------------
    // Frontend-side construction. The catalog never calls these; they
    // exist for the component that produces the stream (and for tests).
    // ------------------------------------------------------------------

    /// Register a scope and return its id.
    pub fn add_scope(&mut self, kind: ScopeKind, nested_in: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            nested_in,
            base_classes: Vec::new(),
        });
        id
    }

    pub fn set_base_classes(&mut self, scope: ScopeId, bases: Vec<String>) {
        self.scopes[scope.0 as usize].base_classes = bases;
    }

    /// Move every token with the given text into `scope`.
    pub fn set_scope_of(&mut self, text: &str, scope: ScopeId) {
        for tok in &mut self.tokens {
            if tok.text == text {
                tok.scope = Some(scope);
            }
        }
    }

    /// Bind every token with the given text to a variable symbol.
    pub fn declare_variable(&mut self, name: &str, var: Variable) {
        self.variables.push(var);
        let var_id = self.variables.len() as u32;
        for tok in &mut self.tokens {
            if tok.text == name {
                tok.var_id = var_id;
            }
        }
    }

    /// Bind every token with the given text to a user function symbol.
    pub fn declare_function(&mut self, name: &str, binding: FunctionBinding) {
        for tok in &mut self.tokens {
            if tok.text == name {
                tok.function = Some(binding);
            }
        }
    }

    /// Compute AST links for the call expressions in the stream.
    ///
    /// Covers the shapes call-site classification consumes: `::`
    /// qualification chains, `.` member access (including folded `->`),
    /// call parentheses with comma-chained arguments, and unary `&`/`*`
    /// in front of a callee.
    pub fn build_call_ast(&mut self) {
        let mut pos = 0usize;
        while pos < self.tokens.len() {
            // Parse one expression, then step over whatever stopped it
            // (statement separators and operators we do not model).
            pos = self.parse_expression(pos) + 1;
        }
    }

    fn set_binary(&mut self, op: usize, lhs: Option<usize>, rhs: Option<usize>) {
        self.tokens[op].ast_op1 = lhs.map(|i| TokenId(i as u32));
        self.tokens[op].ast_op2 = rhs.map(|i| TokenId(i as u32));
        if let Some(l) = lhs {
            self.tokens[l].ast_parent = Some(TokenId(op as u32));
        }
        if let Some(r) = rhs {
            self.tokens[r].ast_parent = Some(TokenId(op as u32));
        }
    }

    // Parses one expression starting at `pos`; returns the index just past
    // it and leaves the AST links behind. Root node index is tracked via
    // ast_parent being unset.
    fn parse_expression(&mut self, pos: usize) -> usize {
        let Some(tok) = self.tokens.get(pos) else {
            return pos;
        };
        match tok.text.as_str() {
            "&" | "*" => {
                let inner_start = pos + 1;
                let end = self.parse_postfix(inner_start);
                if end > inner_start {
                    let inner_root = self.subtree_root(inner_start, end);
                    self.tokens[pos].ast_op1 = Some(TokenId(inner_root as u32));
                    self.tokens[inner_root].ast_parent = Some(TokenId(pos as u32));
                }
                end
            }
            _ => self.parse_postfix(pos),
        }
    }

    // primary := ("::")? name ("::" name)*   (left-assoc `::` nodes)
    // postfix := primary ("." name | "(" args ")" | "[" ... "]")*
    fn parse_postfix(&mut self, pos: usize) -> usize {
        let mut cur = pos;
        let mut root: Option<usize> = None;

        // Leading global qualification: `:: name`.
        if self.text_at(cur) == Some("::") {
            let op = cur;
            cur += 1;
            if self.is_name_at(cur) {
                self.set_binary(op, Some(cur), None);
                root = Some(op);
                cur += 1;
            } else {
                return cur;
            }
        } else if self.is_name_at(cur) || self.tokens[cur].kind == TokenKind::Number {
            root = Some(cur);
            cur += 1;
        } else {
            return cur;
        }

        loop {
            match self.text_at(cur) {
                Some("::") if self.is_name_at(cur + 1) => {
                    let op = cur;
                    self.set_binary(op, root, Some(cur + 1));
                    root = Some(op);
                    cur += 2;
                }
                Some(".") if self.is_name_at(cur + 1) => {
                    let op = cur;
                    // The member name may itself be `a . b :: c`; members
                    // are plain names in the streams we consume.
                    self.set_binary(op, root, Some(cur + 1));
                    root = Some(op);
                    cur += 2;
                }
                Some("(") => {
                    let open = cur;
                    let close = match self.tokens[open].link {
                        Some(c) => c.0 as usize,
                        None => return cur,
                    };
                    let arg_root = self.parse_arguments(open + 1, close);
                    self.set_binary(open, root, arg_root);
                    root = Some(open);
                    cur = close + 1;
                }
                Some("[") => {
                    let open = cur;
                    let close = match self.tokens[open].link {
                        Some(c) => c.0 as usize,
                        None => return cur,
                    };
                    let inner = self.parse_arguments(open + 1, close);
                    self.set_binary(open, root, inner);
                    root = Some(open);
                    cur = close + 1;
                }
                _ => break,
            }
        }
        cur
    }

    // Arguments between a bracket pair, comma-chained the way the analyzer
    // frontend builds them: `f(a, b, c)` gives `,`(`,`(a, b), c).
    fn parse_arguments(&mut self, start: usize, end: usize) -> Option<usize> {
        if start >= end {
            return None;
        }
        let mut arg_roots: Vec<usize> = Vec::new();
        let mut commas: Vec<usize> = Vec::new();
        let mut cur = start;
        let mut arg_start = start;
        while cur < end {
            match self.tokens[cur].text.as_str() {
                "," => {
                    arg_roots.push(self.parse_argument(arg_start, cur));
                    commas.push(cur);
                    cur += 1;
                    arg_start = cur;
                }
                "(" | "[" | "{" | "<" if self.tokens[cur].link.is_some() => {
                    cur = self.tokens[cur].link.unwrap().0 as usize + 1;
                }
                _ => cur += 1,
            }
        }
        arg_roots.push(self.parse_argument(arg_start, end));

        let mut root = arg_roots[0];
        for (i, &comma) in commas.iter().enumerate() {
            self.set_binary(comma, Some(root), Some(arg_roots[i + 1]));
            root = comma;
        }
        Some(root)
    }

    fn parse_argument(&mut self, start: usize, end: usize) -> usize {
        let after = self.parse_expression(start);
        let _ = after;
        self.subtree_root(start, end)
    }

    // Root of the AST covering [start, end): the node without a parent
    // inside the range.
    fn subtree_root(&self, start: usize, end: usize) -> usize {
        for i in start..end.min(self.tokens.len()) {
            let parent = self.tokens[i].ast_parent;
            let inside = parent
                .map(|p| (p.0 as usize) >= start && (p.0 as usize) < end)
                .unwrap_or(false);
            if !inside {
                // Prefer an operator node over a bare operand.
                if self.tokens[i].ast_op1.is_some() || self.tokens[i].ast_op2.is_some() {
                    return i;
                }
            }
        }
        start
    }

    fn text_at(&self, pos: usize) -> Option<&str> {
        self.tokens.get(pos).map(|t| t.text.as_str())
    }

    fn is_name_at(&self, pos: usize) -> bool {
        self.tokens
            .get(pos)
            .map(|t| t.kind == TokenKind::Name)
            .unwrap_or(false)
    }
}

/// Cursor over one token. Copyable, borrows the list.
#[derive(Clone, Copy)]
pub struct Tok<'a> {
    list: &'a TokenList,
    id: TokenId,
}

impl<'a> Tok<'a> {
    fn data(&self) -> &'a TokenData {
        &self.list.tokens[self.id.0 as usize]
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn list(&self) -> &'a TokenList {
        self.list
    }

    pub fn text(&self) -> &'a str {
        self.data().text.as_str()
    }

    pub fn kind(&self) -> TokenKind {
        self.data().kind
    }

    pub fn is_name(&self) -> bool {
        self.data().kind == TokenKind::Name
    }

    pub fn is_number(&self) -> bool {
        self.data().kind == TokenKind::Number
    }

    pub fn is_keyword(&self) -> bool {
        self.data().keyword
    }

    pub fn is_standard_type(&self) -> bool {
        self.data().standard_type
    }

    pub fn var_id(&self) -> u32 {
        self.data().var_id
    }

    pub fn variable(&self) -> Option<&'a Variable> {
        self.list.variable(self.data().var_id)
    }

    pub fn function(&self) -> Option<FunctionBinding> {
        self.data().function
    }

    pub fn scope(&self) -> Option<&'a Scope> {
        self.data().scope.map(|s| self.list.scope(s))
    }

    pub fn scope_id(&self) -> Option<ScopeId> {
        self.data().scope
    }

    /// Original spelling where simplification rewrote the token (`"->"`).
    pub fn original_name(&self) -> Option<&'a str> {
        self.data().original_name.as_deref()
    }

    pub fn next(&self) -> Option<Tok<'a>> {
        self.data().next.map(|id| self.list.at(id))
    }

    pub fn prev(&self) -> Option<Tok<'a>> {
        self.data().prev.map(|id| self.list.at(id))
    }

    /// Matched bracket partner.
    pub fn link(&self) -> Option<Tok<'a>> {
        self.data().link.map(|id| self.list.at(id))
    }

    pub fn ast_parent(&self) -> Option<Tok<'a>> {
        self.data().ast_parent.map(|id| self.list.at(id))
    }

    pub fn ast_op1(&self) -> Option<Tok<'a>> {
        self.data().ast_op1.map(|id| self.list.at(id))
    }

    pub fn ast_op2(&self) -> Option<Tok<'a>> {
        self.data().ast_op2.map(|id| self.list.at(id))
    }

    /// Unary operator with the given text (one operand, no second).
    pub fn is_unary_op(&self, op: &str) -> bool {
        self.text() == op && self.data().ast_op1.is_some() && self.data().ast_op2.is_none()
    }

    /// Token `n` steps away; negative offsets walk backwards.
    pub fn at_offset(&self, n: i32) -> Option<Tok<'a>> {
        let mut cur = *self;
        for _ in 0..n.abs() {
            cur = if n > 0 { cur.next()? } else { cur.prev()? };
        }
        Some(cur)
    }

    pub fn text_at(&self, n: i32) -> Option<&'a str> {
        self.at_offset(n).map(|t| t.text())
    }

    /// Number of call arguments computed from the raw token stream.
    ///
    /// `self` is the call's name token; the count is the top-level comma
    /// count between the call parentheses plus one, zero for `( )`.
    pub fn call_argument_count(&self) -> usize {
        let Some(open) = self.next().filter(|t| t.text() == "(") else {
            return 0;
        };
        let Some(close) = open.link() else {
            return 0;
        };
        if open.next().map(|t| t.id) == Some(close.id) {
            return 0;
        }
        let mut count = 1;
        let mut cur = open.next();
        while let Some(tok) = cur {
            if tok.id == close.id {
                break;
            }
            match tok.text() {
                "," => {
                    count += 1;
                    cur = tok.next();
                }
                "(" | "[" | "{" | "<" if tok.link().is_some() => {
                    cur = tok.link().and_then(|l| l.next());
                }
                _ => cur = tok.next(),
            }
        }
        count
    }
}

impl std::fmt::Debug for Tok<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tok({:?} @{})", self.text(), self.id.0)
    }
}

fn classify(text: &str) -> TokenKind {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => TokenKind::Number,
        Some('.') if text.len() > 1 && text.as_bytes()[1].is_ascii_digit() => TokenKind::Number,
        Some(c) if c.is_ascii_alphabetic() || c == '_' => TokenKind::Name,
        Some('"') => TokenKind::StringLiteral,
        Some('\'') => TokenKind::CharLiteral,
        _ => TokenKind::Op,
    }
}

fn lex(code: &str) -> Vec<SmolStr> {
    let bytes = code.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        if c.is_ascii_alphabetic() || c == '_' {
            while i < bytes.len()
                && ((bytes[i] as char).is_ascii_alphanumeric() || bytes[i] == b'_')
            {
                i += 1;
            }
        } else if c.is_ascii_digit() {
            while i < bytes.len()
                && ((bytes[i] as char).is_ascii_alphanumeric()
                    || bytes[i] == b'.'
                    || ((bytes[i] == b'+' || bytes[i] == b'-')
                        && matches!(bytes[i - 1], b'e' | b'E')))
            {
                i += 1;
            }
        } else if c == '"' || c == '\'' {
            let quote = bytes[i];
            i += 1;
            while i < bytes.len() && bytes[i] != quote {
                i += if bytes[i] == b'\\' { 2 } else { 1 };
            }
            i = (i + 1).min(bytes.len());
        } else if i + 1 < bytes.len()
            && TWO_CHAR_OPS.contains(&&code[i..i + 2])
        {
            i += 2;
        } else {
            i += 1;
        }
        out.push(SmolStr::new(&code[start..i]));
    }
    out
}
