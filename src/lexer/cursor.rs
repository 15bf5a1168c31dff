use std::str::Chars;

#[derive(Clone)]
pub struct Cursor<'a> {
    chars: Chars<'a>,
    ln: u64,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        let chars = s.chars();
        Self { chars, ln: 1 }
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub fn peek_2nd(&self) -> Option<char> {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next()
    }

    #[inline]
    pub fn skip_if(&mut self, p: impl FnOnce(char) -> bool) -> bool {
        let skipped = self.peek().filter(|&c| p(c)).is_some();
        if skipped {
            self.take();
        }
        skipped
    }

    pub fn take_while(&mut self, p: impl Fn(char) -> bool) -> String {
        let mut buf = String::new();
        while let Some(c) = self.peek().filter(|&c| p(c)) {
            buf.push(c);
            self.take();
        }
        buf
    }

    pub fn take(&mut self) -> Option<char> {
        let next = self.chars.next();
        if next == Some('\n') {
            self.ln += 1;
        }
        next
    }

    pub fn get_line(&self) -> u64 {
        self.ln
    }

    pub fn is_eof(&self) -> bool {
        self.peek().is_none()
    }
}
