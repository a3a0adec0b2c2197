//! Declarative description of the options and positional arguments a
//! command accepts.
use std::fmt::Write;

/// The type of the value an argument takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    None,
    /// A flag: presence means `true`. Takes no value.
    Boolean,
    Integer,
    Real,
    String,
    /// An explicit `0|false|no` / `1|true|yes` value.
    StringBool,
}

impl ArgType {
    /// Returns true if an option of this type consumes the following word.
    pub fn takes_value(self) -> bool {
        match self {
            ArgType::None | ArgType::Boolean => false,
            _ => true,
        }
    }

    /// Completion values implied by the type alone. `None` for `String`,
    /// whose values come from the command.
    pub fn fixed_values(self) -> Option<Vec<String>> {
        match self {
            ArgType::StringBool => Some(vec!["0".to_owned(), "1".to_owned()]),
            ArgType::String => None,
            ArgType::None | ArgType::Boolean | ArgType::Integer | ArgType::Real => Some(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// At most one member may be given.
    OptionalOneOf,
    /// Exactly one member must be given.
    RequiredOneOf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgGroup {
    pub id: GroupId,
    pub kind: GroupKind,
}

impl ArgGroup {
    pub fn is_required(&self) -> bool {
        self.kind == GroupKind::RequiredOneOf
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    /// 1-based declaration index.
    pub index: usize,
    /// The name without the leading `-`.
    pub name: String,
    pub is_option: bool,
    pub value_type: ArgType,
    /// Shown as `<short_description>` in the usage.
    pub short_description: String,
    pub long_description: String,
    pub required: bool,
    pub hidden: bool,
    pub multiple: bool,
    /// The value is a filesystem path.
    pub path: bool,
    pub group: Option<GroupId>,
    pub enum_values: Vec<(String, i64)>,
}

impl ArgSpec {
    fn usage(&self) -> String {
        if !self.is_option {
            format!("<{}>", self.short_description)
        } else if self.value_type.takes_value() {
            format!("-{} <{}>", self.name, self.short_description)
        } else {
            format!("-{}", self.name)
        }
    }
}

/// Returned by [`ArgSchema::add_arg`] to refine the new spec.
pub struct ArgSpecBuilder<'a> {
    schema: &'a mut ArgSchema,
    index: usize,
}

impl<'a> ArgSpecBuilder<'a> {
    fn spec(&mut self) -> &mut ArgSpec {
        &mut self.schema.args[self.index]
    }

    pub fn required(mut self) -> Self {
        self.spec().required = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.spec().hidden = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.spec().multiple = true;
        self
    }

    pub fn path(mut self) -> Self {
        self.spec().path = true;
        self
    }

    /// Makes the spec a member of `id`, which must have been declared with
    /// [`ArgSchema::add_group`].
    pub fn group(mut self, id: GroupId) -> Self {
        assert!(
            self.schema.group(id).is_some(),
            "{}: undeclared argument group {:?}",
            self.schema.name,
            id
        );
        self.spec().group = Some(id);
        self
    }

    pub fn enum_value(mut self, label: &str, value: i64) -> Self {
        self.spec().enum_values.push((label.to_owned(), value));
        self
    }
}

/// The ordered argument declarations of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSchema {
    name: String,
    args: Vec<ArgSpec>,
    groups: Vec<ArgGroup>,
}

impl ArgSchema {
    pub fn new(command: &str) -> ArgSchema {
        ArgSchema {
            name: command.to_owned(),
            args: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// The command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares an argument. A leading `-` in `name` makes it an option.
    ///
    /// # Panics
    ///
    /// Panics if an argument of the same name is already declared, option or
    /// not.
    pub fn add_arg(
        &mut self,
        name: &str,
        value_type: ArgType,
        short_description: &str,
        long_description: &str,
    ) -> ArgSpecBuilder<'_> {
        let (name, is_option) = match name.strip_prefix('-') {
            Some(name) => (name, true),
            None => (name, false),
        };

        assert!(
            !self.args.iter().any(|arg| arg.name == name),
            "{}: argument `{}' declared twice",
            self.name,
            name
        );

        self.args.push(ArgSpec {
            index: self.args.len() + 1,
            name: name.to_owned(),
            is_option,
            value_type,
            short_description: short_description.to_owned(),
            long_description: long_description.to_owned(),
            required: false,
            hidden: false,
            multiple: false,
            path: false,
            group: None,
            enum_values: Vec::new(),
        });

        let index = self.args.len() - 1;
        ArgSpecBuilder { schema: self, index }
    }

    pub fn add_group(&mut self, kind: GroupKind) -> GroupId {
        let id = GroupId(self.groups.len() + 1);
        self.groups.push(ArgGroup { id, kind });
        id
    }

    pub fn args(&self) -> &[ArgSpec] {
        &self.args
    }

    pub fn groups(&self) -> &[ArgGroup] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&ArgGroup> {
        self.groups.iter().find(|group| group.id == id)
    }

    /// Looks for an option by its name without the leading `-`.
    pub fn option(&self, name: &str) -> Option<&ArgSpec> {
        self.args
            .iter()
            .find(|arg| arg.is_option && arg.name == name)
    }

    pub fn positionals(&self) -> impl Iterator<Item = &ArgSpec> {
        self.args.iter().filter(|arg| !arg.is_option)
    }

    /// Option names prefixed with `-`, in declaration order.
    pub fn option_names(&self, include_hidden: bool) -> Vec<String> {
        self.args
            .iter()
            .filter(|arg| arg.is_option && (include_hidden || !arg.hidden))
            .map(|arg| format!("-{}", arg.name))
            .collect()
    }

    pub fn group_members(&self, id: GroupId) -> impl Iterator<Item = &ArgSpec> {
        self.args.iter().filter(move |arg| arg.group == Some(id))
    }

    pub fn group_names(&self, id: GroupId) -> Vec<String> {
        self.group_members(id).map(|arg| arg.name.clone()).collect()
    }

    /// The value registered for the enum label `label` of `option`.
    pub fn enum_value_of(&self, option: &str, label: &str) -> Option<i64> {
        self.option(option)?
            .enum_values
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| *value)
    }

    /// Renders the usage text: one line per argument in declaration order,
    /// a single `[a|b]` (or `{a|b}` when required) alternation per group and
    /// `[...]` around optional arguments. Hidden arguments are omitted unless
    /// `show_hidden` is set; `verbose` adds the long descriptions.
    pub fn usage(&self, show_hidden: bool, verbose: bool) -> String {
        let mut text = String::new();
        let mut seen_groups = Vec::new();

        writeln!(text, "{}", self.name).ok();
        for arg in &self.args {
            if arg.hidden && !show_hidden {
                continue;
            }

            match arg.group.and_then(|id| self.group(id)) {
                Some(group) => {
                    if seen_groups.contains(&group.id) {
                        continue;
                    }

                    seen_groups.push(group.id);
                    let members = self
                        .group_members(group.id)
                        .filter(|member| show_hidden || !member.hidden)
                        .map(|member| member.usage())
                        .collect::<Vec<_>>()
                        .join("|");

                    if group.is_required() {
                        writeln!(text, "  {{{}}}", members).ok();
                    } else {
                        writeln!(text, "  [{}]", members).ok();
                    }

                    if verbose {
                        for member in self.group_members(group.id) {
                            if show_hidden || !member.hidden {
                                self.describe(&mut text, member);
                            }
                        }
                    }
                }
                None => {
                    if arg.required {
                        writeln!(text, "  {}", arg.usage()).ok();
                    } else {
                        writeln!(text, "  [{}]", arg.usage()).ok();
                    }

                    if verbose {
                        self.describe(&mut text, arg);
                    }
                }
            }
        }

        text.push_str("  [-help]\n");
        text
    }

    fn describe(&self, text: &mut String, arg: &ArgSpec) {
        if !arg.long_description.is_empty() {
            writeln!(text, "      {}: {}", arg.usage(), arg.long_description).ok();
        }

        if !arg.enum_values.is_empty() {
            let labels: Vec<&str> = arg.enum_values.iter().map(|(l, _)| l.as_str()).collect();
            writeln!(text, "      values: {}", labels.join(", ")).ok();
        }
    }
}
