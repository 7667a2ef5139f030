//! Converts the résumé schema ([`crate::resume`]) into template [`Value`]s.
//! Fields keep their YAML names so templates read like the data file.
//!
//! Every string is HTML-escaped on its way into a [`Value`], so text from the
//! data file can't inject markup into the page. Template functions such as
//! `markdown_links` therefore operate on escaped text.

use crate::resume::*;
use gtmpl_value::Value;
use pulldown_cmark::escape::escape_html;
use std::collections::HashMap;

/// Escapes `&`, `<`, `>`, `"` and `'` for use in HTML text and attribute
/// values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    // Writing to a `String` can't fail.
    let _ = escape_html(&mut out, s);
    out.replace('\'', "&#39;")
}

fn text(s: &str) -> Value {
    Value::String(escape(s))
}

fn optional(s: &Option<String>) -> Value {
    match s {
        Some(s) => text(s),
        None => Value::Nil,
    }
}

fn strings(items: &[String]) -> Value {
    Value::Array(items.iter().map(|s| text(s)).collect())
}

fn array<'a, T: 'a>(items: &'a [T]) -> Value
where
    Value: From<&'a T>,
{
    Value::Array(items.iter().map(Value::from).collect())
}

impl From<&ResumeData> for Value {
    fn from(data: &ResumeData) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("author".to_owned(), text(&data.author));
        m.insert(
            "base_url".to_owned(),
            text(data.base_url.as_str()),
        );
        m.insert("photo".to_owned(), text(&data.photo));
        m.insert("pdf_filename".to_owned(), text(&data.pdf_filename));
        m.insert("about".to_owned(), text(&data.about));
        m.insert("positions".to_owned(), strings(&data.positions));
        m.insert("location".to_owned(), text(&data.location));
        m.insert("contacts".to_owned(), (&data.contacts).into());
        m.insert("experience".to_owned(), array(&data.experience));
        m.insert("education".to_owned(), array(&data.education));
        m.insert("skills".to_owned(), (&data.skills).into());
        m.insert("patents".to_owned(), array(&data.patents));
        Value::Object(m)
    }
}

impl From<&Contact> for Value {
    fn from(c: &Contact) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("email".to_owned(), text(&c.email));
        m.insert("github".to_owned(), text(&c.github));
        m.insert("linkedin".to_owned(), text(&c.linkedin));
        Value::Object(m)
    }
}

impl From<&DateRange> for Value {
    /// Converts a [`DateRange`] into a [`Value`]. Besides `start` and `end`,
    /// the object carries `present`, which is true when `end` is missing.
    fn from(d: &DateRange) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("start".to_owned(), text(&d.start));
        m.insert("end".to_owned(), optional(&d.end));
        m.insert("present".to_owned(), Value::Bool(d.is_present()));
        Value::Object(m)
    }
}

impl From<&Job> for Value {
    fn from(j: &Job) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("position".to_owned(), text(&j.position));
        m.insert("company".to_owned(), text(&j.company));
        m.insert("location".to_owned(), text(&j.location));
        m.insert("dates".to_owned(), (&j.dates).into());
        m.insert("highlights".to_owned(), strings(&j.highlights));
        m.insert(
            "techStack".to_owned(),
            match &j.tech_stack {
                Some(stack) => strings(stack),
                None => Value::Nil,
            },
        );
        Value::Object(m)
    }
}

impl From<&Education> for Value {
    fn from(e: &Education) -> Value {
        let flag = |b: Option<bool>| match b {
            Some(b) => Value::Bool(b),
            None => Value::Nil,
        };

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("institution".to_owned(), text(&e.institution));
        m.insert("major".to_owned(), text(&e.major));
        m.insert("degree".to_owned(), text(&e.degree));
        m.insert("honor".to_owned(), flag(e.honor));
        m.insert("graduated".to_owned(), flag(e.graduated));
        m.insert("dates".to_owned(), (&e.dates).into());
        m.insert(
            "gpa".to_owned(),
            match &e.gpa {
                Some(gpa) => gpa.into(),
                None => Value::Nil,
            },
        );
        m.insert("highlights".to_owned(), strings(&e.highlights));
        Value::Object(m)
    }
}

impl From<&Scalar> for Value {
    fn from(s: &Scalar) -> Value {
        match s {
            Scalar::Number(n) => Value::from(*n),
            Scalar::Text(t) => text(t),
        }
    }
}

impl From<&Gpa> for Value {
    /// Converts a [`Gpa`] into a [`Value`] with `value`, `max`, and the
    /// preformatted `display` (`value/max`).
    fn from(g: &Gpa) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("value".to_owned(), (&g.value).into());
        m.insert("max".to_owned(), (&g.max).into());
        m.insert("display".to_owned(), text(&g.to_string()));
        Value::Object(m)
    }
}

impl From<&Skills> for Value {
    fn from(s: &Skills) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("languages".to_owned(), array(&s.languages));
        Value::Object(m)
    }
}

impl From<&Language> for Value {
    fn from(l: &Language) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("name".to_owned(), text(&l.name));
        m.insert("level".to_owned(), text(&l.level));
        Value::Object(m)
    }
}

impl From<&Patent> for Value {
    fn from(p: &Patent) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("code".to_owned(), text(&p.code));
        m.insert("title".to_owned(), text(&p.title));
        m.insert("link".to_owned(), text(&p.link));
        Value::Object(m)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::resume::test::sample;

    fn field<'a>(value: &'a Value, name: &str) -> &'a Value {
        match value {
            Value::Object(m) => &m[name],
            _ => panic!("not an object: {:?}", value),
        }
    }

    fn string(value: &Value) -> &str {
        match value {
            Value::String(s) => s,
            _ => panic!("not a string: {:?}", value),
        }
    }

    #[test]
    fn test_resume_to_value() {
        let value = Value::from(&sample());
        assert_eq!("Jane Doe", string(field(&value, "author")));
        assert_eq!(
            "https://jane.example.com/",
            string(field(&value, "base_url"))
        );

        match field(&value, "experience") {
            Value::Array(jobs) => {
                assert_eq!(2, jobs.len());
                assert_eq!("Acme", string(field(&jobs[0], "company")));
                assert_eq!("Initech", string(field(&jobs[1], "company")));
                match field(field(&jobs[0], "dates"), "present") {
                    Value::Bool(present) => assert!(*present),
                    other => panic!("expected bool, got {:?}", other),
                }
                match field(&jobs[1], "techStack") {
                    Value::Nil => {}
                    other => panic!("expected nil, got {:?}", other),
                }
            }
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt; &quot;say&quot; &#39;hi&#39;",
            escape(r#"<b>Tom & Jerry</b> "say" 'hi'"#)
        );
        assert_eq!("plain text", escape("plain text"));
    }

    #[test]
    fn test_strings_are_escaped() {
        let mut data = sample();
        data.author = "<script>alert(1)</script> & Co".to_owned();
        data.positions = vec!["R&D".to_owned()];
        let value = Value::from(&data);
        assert_eq!(
            "&lt;script&gt;alert(1)&lt;/script&gt; &amp; Co",
            string(field(&value, "author"))
        );
        match field(&value, "positions") {
            Value::Array(positions) => assert_eq!("R&amp;D", string(&positions[0])),
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_gpa_display_value() {
        let data = sample();
        let value = Value::from(&data.education[1]);
        assert_eq!(
            "First Class/Honours",
            string(field(field(&value, "gpa"), "display"))
        );
    }
}
