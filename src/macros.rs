lazy_static! {
    pub static ref COLORS_ENABLED: bool = {
        use crossterm::tty::IsTty;
        std::io::stdout().is_tty()
    };
}

#[macro_export]
macro_rules! print_err {
    () => { eprintln!(""); };
    ($fmt:expr) => {
        if *$crate::macros::COLORS_ENABLED {
            eprintln!(concat!("{}{}dframe: ", $fmt, "{}"),
                ::crossterm::style::SetAttribute(::crossterm::style::Attribute::Bold),
                ::crossterm::style::SetForegroundColor(::crossterm::style::Color::Yellow),
                ::crossterm::style::SetAttribute(::crossterm::style::Attribute::Reset));
        } else {
            eprintln!(concat!("dframe: ", $fmt));
        }
    };
    ($fmt:expr, $($arg:tt)*) => {
        if *$crate::macros::COLORS_ENABLED {
            eprintln!(concat!("{}{}dframe: ", $fmt, "{}"),
                ::crossterm::style::SetAttribute(::crossterm::style::Attribute::Bold),
                ::crossterm::style::SetForegroundColor(::crossterm::style::Color::Yellow),
                $($arg)*,
                ::crossterm::style::SetAttribute(::crossterm::style::Attribute::Reset));
        } else {
            eprintln!(concat!("dframe: ", $fmt), $($arg)*);
        }
    };
}
