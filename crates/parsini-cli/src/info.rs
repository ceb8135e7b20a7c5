//! The demo info model, decoded by `parsini info`.

use std::fmt;

use parsini_decode::{Decode, Decoder, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Info {
    pub title: String,
    pub copyright: String,
    pub year: i64,
    pub developers: Vec<String>,
    pub demos: Option<Demo>,
    pub company: Company,
    pub conference: Conference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Demo {
    pub demo_count: u64,
    pub best_demo: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub name: String,
    pub founding_year: u16,
    pub employee_count: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conference {
    pub name: String,
    pub is_anniversary: bool,
}

impl Decode for Info {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let mut container = decoder.keyed_container()?;
        Ok(Info {
            title: container.decode_string("title")?,
            copyright: container.decode_string("copyright")?,
            year: container.decode_i64("year")?,
            developers: container.decode("developers")?,
            demos: container.decode_if_present("demos")?,
            company: container.decode("company")?,
            conference: container.decode("conference")?,
        })
    }
}

impl Decode for Demo {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let mut container = decoder.keyed_container()?;
        Ok(Demo {
            demo_count: container.decode_u64("demo_count")?,
            best_demo: container.decode_string("best_demo")?,
        })
    }
}

impl Decode for Company {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let mut container = decoder.keyed_container()?;
        Ok(Company {
            name: container.decode_string("name")?,
            founding_year: container.decode_u16("founding_year")?,
            employee_count: container.decode_u8("employee_count")?,
        })
    }
}

impl Decode for Conference {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let mut container = decoder.keyed_container()?;
        Ok(Conference {
            name: container.decode_string("name")?,
            is_anniversary: container.decode_bool("is_anniversary")?,
        })
    }
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.title, self.year)?;
        writeln!(f, "(c) {}", self.copyright)?;
        writeln!(f, "developers: {}", self.developers.join(", "))?;
        writeln!(
            f,
            "company: {}, founded {}, {} employees",
            self.company.name, self.company.founding_year, self.company.employee_count
        )?;
        write!(f, "conference: {}", self.conference.name)?;
        if self.conference.is_anniversary {
            write!(f, " (anniversary)")?;
        }
        writeln!(f)?;
        match &self.demos {
            Some(demos) => writeln!(f, "demos: {} (best: {})", demos.demo_count, demos.best_demo),
            None => writeln!(f, "demos: none"),
        }
    }
}
