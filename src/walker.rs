/*!
 * Directory walking and conversion of entries into items
 */

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::classify::{self, Classification};
use crate::error::Result;
use crate::object::{ClassName, ObjectNode};
use crate::referent::ReferentAllocator;
use crate::splice;
use crate::xml::Element;

/// Walk statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStatistics {
    /// Containers created for directories
    pub containers: usize,
    /// Script objects
    pub scripts: usize,
    /// Module script objects
    pub module_scripts: usize,
    /// Value objects
    pub values: usize,
    /// Model files spliced in
    pub models: usize,
    /// Top-level objects contributed by spliced models
    pub spliced_objects: usize,
    /// Referents in the finished document
    pub referents: usize,
}

impl WalkStatistics {
    fn record(&mut self, class: ClassName) {
        match class {
            ClassName::Backpack => self.containers += 1,
            ClassName::Script => self.scripts += 1,
            ClassName::ModuleScript => self.module_scripts += 1,
            ClassName::StringValue => self.values += 1,
        }
    }

    /// Objects created directly from filesystem entries
    pub fn objects_created(&self) -> usize {
        self.containers + self.scripts + self.module_scripts + self.values
    }
}

/// Files sort before directories, then by name
fn entry_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// List a directory's entries in walk order
pub fn list_entries(dir: &Path) -> Result<Vec<DirEntry>> {
    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by(entry_order)
        .into_iter()
        .collect::<std::result::Result<Vec<_>, walkdir::Error>>()?;
    Ok(entries)
}

/// Converts a directory tree into laid-out items
pub struct Walker {
    /// Progress bar, advanced once per file
    progress: Arc<ProgressBar>,
    /// Walk statistics
    statistics: WalkStatistics,
}

impl Walker {
    /// Create a new walker
    pub fn new(progress: Arc<ProgressBar>) -> Self {
        Self {
            progress,
            statistics: WalkStatistics::default(),
        }
    }

    /// Get walk statistics
    pub fn statistics(&self) -> &WalkStatistics {
        &self.statistics
    }

    /// Consume the walker, returning its statistics
    pub fn into_statistics(self) -> WalkStatistics {
        self.statistics
    }

    /// Record the number of referents in the finished document
    pub(crate) fn set_referents(&mut self, referents: usize) {
        self.statistics.referents = referents;
    }

    /// Convert every entry of `dir` into items laid out for `depth`
    ///
    /// Failing to list a directory aborts the walk. Entries that cannot be
    /// converted are left out.
    pub fn walk(
        &mut self,
        dir: &Path,
        depth: usize,
        allocator: &mut ReferentAllocator,
    ) -> Result<Vec<Element>> {
        debug!(dir = %dir.display(), depth, "walking directory");

        let mut items: Vec<Element> = Vec::new();
        // Base name -> index into `items` of the first item created for it
        let mut siblings: HashMap<String, usize> = HashMap::new();

        for entry in list_entries(dir)? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().is_dir();
            let base = classify::base_name(&name, is_dir).to_string();

            if is_dir {
                if let Err(e) = classify::check_characters(&name) {
                    warn!(path = %entry.path().display(), error = %e, "skipping directory");
                    continue;
                }
                let index = match siblings.get(&base).copied() {
                    Some(index) => index,
                    None => {
                        let item = self.create(ObjectNode::container(&name), depth, allocator);
                        items.push(item);
                        siblings.insert(base, items.len() - 1);
                        items.len() - 1
                    }
                };

                let nested = self.walk(entry.path(), depth + 1, allocator)?;
                for child in nested {
                    items[index].append_laid_out(child, depth + 1);
                }
                continue;
            }

            let created = self.convert_file(entry.path(), &name, depth, allocator);
            if !created.is_empty() {
                siblings.entry(base).or_insert(items.len());
                items.extend(created);
            }
        }

        Ok(items)
    }

    /// Convert one file, returning no items when it has to be skipped
    fn convert_file(
        &mut self,
        path: &Path,
        name: &str,
        depth: usize,
        allocator: &mut ReferentAllocator,
    ) -> Vec<Element> {
        self.progress.inc(1);
        self.progress.set_message(format!("Current file: {}", name));

        match classify::classify(path, name, false) {
            Ok(Classification::Object(object)) => vec![self.create(object, depth, allocator)],
            Ok(Classification::Model) => match splice::splice_model(path, allocator, depth) {
                Ok(items) => {
                    self.statistics.models += 1;
                    self.statistics.spliced_objects += items.len();
                    items
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping model");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                Vec::new()
            }
        }
    }

    /// Assign a referent to a new object and render it
    fn create(
        &mut self,
        mut object: ObjectNode,
        depth: usize,
        allocator: &mut ReferentAllocator,
    ) -> Element {
        object.referent = Some(allocator.next());
        self.statistics.record(object.class);
        object.to_element(depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    use crate::xml::REFERENT_ATTR;

    fn walk(dir: &Path) -> (Vec<Element>, Walker) {
        let mut walker = Walker::new(Arc::new(ProgressBar::hidden()));
        let mut allocator = ReferentAllocator::new();
        let items = walker.walk(dir, 1, &mut allocator).unwrap();
        (items, walker)
    }

    fn name_of(item: &Element) -> String {
        let properties = item.elements().next().unwrap();
        properties
            .elements()
            .find(|p| p.attr("name") == Some("Name"))
            .and_then(|p| p.first_text())
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn files_sort_before_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("c.lua"), "c").unwrap();

        let names: Vec<_> = list_entries(dir.path())
            .unwrap()
            .iter()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["b.txt", "c.lua", "a"]);
    }

    #[test]
    fn file_and_directory_share_one_item() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("foo.txt"), "value").unwrap();
        fs::create_dir(dir.path().join("foo")).unwrap();
        fs::write(dir.path().join("foo").join("inner.lua"), "").unwrap();

        let (items, walker) = walk(dir.path());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].attr("class"), Some("StringValue"));

        let nested: Vec<_> = items[0].elements().skip(1).collect();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].attr("class"), Some("Script"));
        assert_eq!(name_of(nested[0]), "inner");
        assert_eq!(walker.statistics().containers, 0);
    }

    #[test]
    fn sibling_reuse_does_not_cross_directories() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("foo.txt"), "").unwrap();
        fs::create_dir_all(dir.path().join("sub").join("foo")).unwrap();

        let (items, _) = walk(dir.path());
        assert_eq!(items.len(), 2);
        let sub = &items[1];
        let nested: Vec<_> = sub.elements().skip(1).collect();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].attr("class"), Some("Backpack"));
    }

    #[test]
    fn referents_follow_walk_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Main.lua"), "").unwrap();
        fs::create_dir(dir.path().join("Lib")).unwrap();
        fs::write(dir.path().join("Lib").join("Util.module.lua"), "").unwrap();

        let (items, _) = walk(dir.path());
        assert_eq!(items[0].attr(REFERENT_ATTR), Some("RBX0"));
        assert_eq!(items[1].attr(REFERENT_ATTR), Some("RBX1"));
        let util = items[1].elements().nth(1).unwrap();
        assert_eq!(util.attr(REFERENT_ATTR), Some("RBX2"));
    }

    #[test]
    fn broken_model_is_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("broken.rbxm"), "<roblox><Item></roblox>").unwrap();
        fs::write(dir.path().join("empty.rbxm"), "<roblox></roblox>").unwrap();
        fs::write(dir.path().join("z.txt"), "z").unwrap();

        let (items, walker) = walk(dir.path());
        let names: Vec<_> = items.iter().map(name_of).collect();
        assert_eq!(names, ["a", "z"]);
        assert_eq!(walker.statistics().models, 0);
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = tempdir().unwrap();
        let mut walker = Walker::new(Arc::new(ProgressBar::hidden()));
        let mut allocator = ReferentAllocator::new();
        assert!(walker
            .walk(&dir.path().join("missing"), 1, &mut allocator)
            .is_err());
    }

    #[test]
    fn statistics_count_classes() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.lua"), "").unwrap();
        fs::write(dir.path().join("b.module.lua"), "").unwrap();
        fs::write(dir.path().join("c.txt"), "").unwrap();
        fs::create_dir(dir.path().join("d")).unwrap();

        let (_, walker) = walk(dir.path());
        let stats = walker.into_statistics();
        assert_eq!(stats.scripts, 1);
        assert_eq!(stats.module_scripts, 1);
        assert_eq!(stats.values, 1);
        assert_eq!(stats.containers, 1);
        assert_eq!(stats.objects_created(), 4);
    }
}
