//! Search filters understood by the listing site
//!
//! Each filter maps to one query parameter of the search URL.

use clap::ValueEnum;
use std::fmt;

/// Result ordering (`sort=`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Sort {
    #[default]
    Relevance,
    UploadDate,
    Rating,
    Length,
    Views,
    Random,
}

impl Sort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::UploadDate => "uploaddate",
            Self::Rating => "rating",
            Self::Length => "length",
            Self::Views => "views",
            Self::Random => "random",
        }
    }
}

/// Upload date window (`datef=`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum SortDate {
    #[default]
    All,
    /// Last three days
    Today,
    Week,
    Month,
    ThreeMonths,
    SixMonths,
}

impl SortDate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::ThreeMonths => "3month",
            Self::SixMonths => "6month",
        }
    }
}

/// Video duration bucket (`durf=`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum SortVideoTime {
    #[default]
    All,
    /// 1 to 3 minutes
    Short,
    /// 3 to 10 minutes
    Middle,
    /// More than 10 minutes
    Long,
    /// 10 to 20 minutes
    Long10To20,
    /// More than 20 minutes
    ReallyLong,
}

impl SortVideoTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "allduration",
            Self::Short => "1-3min",
            Self::Middle => "3-10min",
            Self::Long => "10min_more",
            Self::Long10To20 => "10-20min",
            Self::ReallyLong => "20min_more",
        }
    }
}

/// Minimum quality (`quality=`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum SortQuality {
    #[default]
    All,
    /// 720p and above
    Hd,
    /// 1080p and above
    FullHd,
}

impl SortQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Hd => "hd",
            Self::FullHd => "1080P",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Sort, SortDate, SortVideoTime, SortQuality);

/// All search filters together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchFilters {
    pub sort: Sort,
    pub date: SortDate,
    pub duration: SortVideoTime,
    pub quality: SortQuality,
}
