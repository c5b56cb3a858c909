//! CST printer
//!
//! Renders any node back to text. In [`PrintMode::Verbatim`] every terminal
//! prints the exact text it was parsed from, so printing a parsed node
//! reproduces its source span byte for byte. In [`PrintMode::Canonical`]
//! terminals with equivalent spellings print their first, canonical one
//! (`(` for `%28`, `true` for `TRUE`).

/// How terminals with alternate spellings are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintMode {
    #[default]
    Verbatim,
    Canonical,
}

/// Output buffer threaded through [`Print`] implementations
#[derive(Debug, Clone, Default)]
pub struct Printer {
    out: String,
    mode: PrintMode,
}

impl Printer {
    pub fn new(mode: PrintMode) -> Self {
        Printer {
            out: String::new(),
            mode,
        }
    }

    pub fn mode(&self) -> PrintMode {
        self.mode
    }

    /// Emit a terminal.
    ///
    /// `canonical` is the preferred spelling for terminals that have one.
    pub fn token(&mut self, text: &str, canonical: Option<&str>) {
        match (self.mode, canonical) {
            (PrintMode::Canonical, Some(canonical)) => self.out.push_str(canonical),
            _ => self.out.push_str(text),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Rendering of a node or slot back to text
pub trait Print {
    fn print(&self, p: &mut Printer);
}

impl<T: Print + ?Sized> Print for Box<T> {
    fn print(&self, p: &mut Printer) {
        (**self).print(p)
    }
}

impl<T: Print> Print for Option<T> {
    fn print(&self, p: &mut Printer) {
        if let Some(inner) = self {
            inner.print(p);
        }
    }
}

impl<T: Print> Print for Vec<T> {
    fn print(&self, p: &mut Printer) {
        for item in self {
            item.print(p);
        }
    }
}

macro_rules! tuple_print {
    ($($name:ident)+) => {
        impl<$($name: Print),+> Print for ($($name,)+) {
            #[allow(non_snake_case)]
            fn print(&self, p: &mut Printer) {
                let ($($name,)+) = self;
                $($name.print(p);)+
            }
        }
    };
}

tuple_print!(A B);
tuple_print!(A B C);
tuple_print!(A B C D);
tuple_print!(A B C D E);
tuple_print!(A B C D E F);

/// Source text of a node
pub fn print<T: Print + ?Sized>(node: &T) -> String {
    print_with(node, PrintMode::Verbatim)
}

/// Text of a node with every terminal in its canonical spelling
pub fn print_canonical<T: Print + ?Sized>(node: &T) -> String {
    print_with(node, PrintMode::Canonical)
}

pub fn print_with<T: Print + ?Sized>(node: &T, mode: PrintMode) -> String {
    let mut printer = Printer::new(mode);
    node.print(&mut printer);
    printer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Term(&'static str, Option<&'static str>);

    impl Print for Term {
        fn print(&self, p: &mut Printer) {
            p.token(self.0, self.1);
        }
    }

    #[test]
    fn test_modes() {
        let node = (Term("%28", Some("(")), Term("x", None), Some(Term(")", Some(")"))));
        assert_eq!(print(&node), "%28x)");
        assert_eq!(print_canonical(&node), "(x)");
    }

    #[test]
    fn test_containers() {
        let node: (Vec<Term>, Option<Term>) = (vec![Term("a", None), Term("b", None)], None);
        assert_eq!(print(&node), "ab");
        let boxed: Box<Term> = Box::new(Term("TRUE", Some("true")));
        assert_eq!(print_canonical(&boxed), "true");
    }
}
