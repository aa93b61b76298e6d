//! Release orchestration
//!
//! A release is a fixed, ordered list of [`ReleaseStep`]s. Each step either
//! succeeds or aborts the whole release; nothing is retried or rolled back,
//! the release is rerun after a manual fix.

use crate::core::config::ChangelogGenerator;
use crate::core::context::{RepoContext, Tool};
use crate::core::error::{RelkitResult, ResultExt, ValidationError};
use crate::core::vcs::SystemGit;
use crate::release::changelog::{Changelog, prepend_entry};
use crate::release::manifest::{PackageManifest, package_manifests_in, update_manifest};
use crate::release::version::{VersionPlan, bump_boilerplate_version, ensure_tag_prefix};
use crate::release::{link, version_constant};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// One step of the release sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStep {
  UpdateVersionConstant,
  UpdatePackageVersion,
  UpdateDependents,
  BumpBoilerplatesVersion,
  UpdateLockfile,
  Changelog,
  Commit,
  Tag,
  Build,
  Publish,
  PublishBoilerplates,
  Push,
  TestRelease,
  CommitLockfileChanges,
  PushLockfileChanges,
  Link,
}

impl ReleaseStep {
  /// Every step, in execution order
  pub const SEQUENCE: [ReleaseStep; 16] = [
    ReleaseStep::UpdateVersionConstant,
    ReleaseStep::UpdatePackageVersion,
    ReleaseStep::UpdateDependents,
    ReleaseStep::BumpBoilerplatesVersion,
    ReleaseStep::UpdateLockfile,
    ReleaseStep::Changelog,
    ReleaseStep::Commit,
    ReleaseStep::Tag,
    ReleaseStep::Build,
    ReleaseStep::Publish,
    ReleaseStep::PublishBoilerplates,
    ReleaseStep::Push,
    ReleaseStep::TestRelease,
    ReleaseStep::CommitLockfileChanges,
    ReleaseStep::PushLockfileChanges,
    ReleaseStep::Link,
  ];
}

/// A prepared release: version computed, nothing written yet
pub struct Release<'a> {
  ctx: &'a RepoContext,
  plan: VersionPlan,
  npm_name: String,
  tag: String,
}

impl<'a> Release<'a> {
  /// Compute the release version from the published package's manifest
  pub fn prepare(ctx: &'a RepoContext, explicit_version: Option<&str>) -> RelkitResult<Self> {
    let manifest = PackageManifest::read_dir(&ctx.package_dir())?;
    let old = manifest.require_version()?;
    let plan = VersionPlan::compute(old, explicit_version, &ctx.config.release.version_prefix)?;
    let npm_name = ctx.npm_name()?;
    let tag = plan.tag(&ctx.config.release.tag_prefix);

    Ok(Self {
      ctx,
      plan,
      npm_name,
      tag,
    })
  }

  pub fn plan(&self) -> &VersionPlan {
    &self.plan
  }

  pub fn tag(&self) -> &str {
    &self.tag
  }

  /// Human-readable summary of what a step will do
  pub fn describe(&self, step: ReleaseStep) -> String {
    let release = &self.ctx.config.release;
    let layout = &self.ctx.config.layout;
    match step {
      ReleaseStep::UpdateVersionConstant => format!(
        "Update version constant in {} file(s): {} -> {}",
        layout.version_files.len(),
        self.plan.old,
        self.plan.new
      ),
      ReleaseStep::UpdatePackageVersion => format!(
        "Set {}/package.json version to {}",
        layout.package_dir.display(),
        self.plan.new
      ),
      ReleaseStep::UpdateDependents => format!(
        "Point {} and {} packages at {}@{}",
        layout.boilerplates_dir.display(),
        layout.examples_dir.display(),
        self.npm_name,
        self.plan.new
      ),
      ReleaseStep::BumpBoilerplatesVersion => {
        format!("Bump {}/package.json patch version", layout.boilerplates_dir.display())
      }
      ReleaseStep::UpdateLockfile => "npm install".to_string(),
      ReleaseStep::Changelog => match release.changelog {
        ChangelogGenerator::ConventionalChangelog => format!(
          "npx conventional-changelog -p angular -i {} -s --pkg {}",
          release.changelog_file.display(),
          layout.package_dir.display()
        ),
        ChangelogGenerator::Native => format!("Prepend release notes to {}", release.changelog_file.display()),
      },
      ReleaseStep::Commit => format!("git commit -am \"release: {}\"", self.tag),
      ReleaseStep::Tag => format!("git tag {}", self.tag),
      ReleaseStep::Build => format!("npm run {}", release.build_script),
      ReleaseStep::Publish => format!("npm publish ({})", layout.package_dir.display()),
      ReleaseStep::PublishBoilerplates => format!("npm publish ({})", layout.boilerplates_dir.display()),
      ReleaseStep::Push | ReleaseStep::PushLockfileChanges => "git push && git push --tags".to_string(),
      ReleaseStep::TestRelease => format!("npm run {}", release.post_release_script),
      ReleaseStep::CommitLockfileChanges => "git commit -am \"chore: update lockfiles\"".to_string(),
      ReleaseStep::Link => format!("Link {} into boilerplates and examples", self.npm_name),
    }
  }

  /// Run every step in order, stopping at the first failure
  pub fn run(&self, git: &SystemGit) -> RelkitResult<()> {
    let total = ReleaseStep::SEQUENCE.len();
    for (index, step) in ReleaseStep::SEQUENCE.iter().enumerate() {
      info!("[{}/{}] {}", index + 1, total, self.describe(*step));
      self
        .execute(*step, git)
        .with_context(|| format!("Release step {:?} failed", step))?;
    }
    Ok(())
  }

  fn execute(&self, step: ReleaseStep, git: &SystemGit) -> RelkitResult<()> {
    let root = &self.ctx.root;
    let release = &self.ctx.config.release;
    match step {
      ReleaseStep::UpdateVersionConstant => self.update_version_constant(),
      ReleaseStep::UpdatePackageVersion => self.update_package_version(),
      ReleaseStep::UpdateDependents => self.update_dependents(),
      ReleaseStep::BumpBoilerplatesVersion => self.bump_boilerplates_version(),
      ReleaseStep::UpdateLockfile => self.ctx.tool(Tool::Npm, root)?.arg("install").follow(),
      ReleaseStep::Changelog => self.changelog(git),
      ReleaseStep::Commit => {
        self.ensure_tag()?;
        git.commit_all(&format!("release: {}", self.tag))
      }
      ReleaseStep::Tag => {
        self.ensure_tag()?;
        git.tag(&self.tag)
      }
      // A fresh build so the published dist/package.json carries the new version
      ReleaseStep::Build => self
        .ctx
        .tool(Tool::Npm, root)?
        .args(["run", release.build_script.as_str()])
        .follow(),
      ReleaseStep::Publish => self.ctx.tool(Tool::Npm, &self.ctx.package_dir())?.arg("publish").follow(),
      ReleaseStep::PublishBoilerplates => self
        .ctx
        .tool(Tool::Npm, &self.ctx.boilerplates_dir())?
        .arg("publish")
        .follow(),
      ReleaseStep::Push | ReleaseStep::PushLockfileChanges => {
        git.push()?;
        git.push_tags()
      }
      ReleaseStep::TestRelease => self
        .ctx
        .tool(Tool::Npm, root)?
        .args(["run", release.post_release_script.as_str()])
        .follow(),
      ReleaseStep::CommitLockfileChanges => {
        if git.has_tracked_changes()? {
          git.commit_all("chore: update lockfiles")
        } else {
          info!("No lockfile changes to commit");
          Ok(())
        }
      }
      ReleaseStep::Link => link::link(self.ctx, None),
    }
  }

  fn ensure_tag(&self) -> RelkitResult<()> {
    let release = &self.ctx.config.release;
    ensure_tag_prefix(&self.tag, &format!("{}{}", release.tag_prefix, release.version_prefix))
  }

  fn update_version_constant(&self) -> RelkitResult<()> {
    let files: Vec<PathBuf> = self
      .ctx
      .config
      .layout
      .version_files
      .iter()
      .map(|f| self.ctx.root.join(f))
      .collect();
    if files.is_empty() {
      info!("No version files configured");
      return Ok(());
    }
    let name = self.ctx.version_constant()?;
    version_constant::update_version_files(&files, &name, &self.plan.old, &self.plan.new)
  }

  fn update_package_version(&self) -> RelkitResult<()> {
    let manifest = self.ctx.package_dir().join("package.json");
    update_manifest(&manifest, |pkg| {
      pkg.set_version(&self.plan.new);
      Ok(())
    })
  }

  /// Move every boilerplate and example package from the old to the new version
  ///
  /// Each dependent must currently pin exactly the old version (`^old` for
  /// caret-range boilerplates); a mismatch aborts before that manifest is written.
  pub fn update_dependents(&self) -> RelkitResult<()> {
    let boilerplates_dir = self.ctx.boilerplates_dir();
    let mut manifests = package_manifests_in(&boilerplates_dir)?;
    manifests.extend(package_manifests_in(&self.ctx.examples_dir())?);

    for manifest_path in manifests {
      let caret = self.uses_caret_range(&boilerplates_dir, &manifest_path);
      let (expected, next) = if caret {
        (format!("^{}", self.plan.old), format!("^{}", self.plan.new))
      } else {
        (self.plan.old.clone(), self.plan.new.clone())
      };

      update_manifest(&manifest_path, |pkg| {
        let current = pkg.dependency(&self.npm_name);
        if current != Some(expected.as_str()) {
          return Err(
            ValidationError::DependencyMismatch {
              manifest: manifest_path.clone(),
              dependency: self.npm_name.clone(),
              expected: expected.clone(),
              found: current.map(String::from),
            }
            .into(),
          );
        }
        pkg.set_dependency(&self.npm_name, &next);
        Ok(())
      })?;
      log::debug!("{}: {} -> {}", manifest_path.display(), expected, next);
    }

    Ok(())
  }

  fn uses_caret_range(&self, boilerplates_dir: &Path, manifest_path: &Path) -> bool {
    manifest_path.starts_with(boilerplates_dir)
      && manifest_path
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().starts_with(&self.ctx.config.release.caret_prefix))
        .unwrap_or(false)
  }

  fn bump_boilerplates_version(&self) -> RelkitResult<()> {
    let manifest = self.ctx.boilerplates_dir().join("package.json");
    let prefix = &self.ctx.config.release.boilerplate_version_prefix;
    update_manifest(&manifest, |pkg| {
      let next = bump_boilerplate_version(pkg.require_version()?, prefix)?;
      pkg.set_version(&next);
      Ok(())
    })
  }

  fn changelog(&self, git: &SystemGit) -> RelkitResult<()> {
    let release = &self.ctx.config.release;
    let changelog_path = self.ctx.root.join(&release.changelog_file);

    match release.changelog {
      ChangelogGenerator::ConventionalChangelog => {
        let package_dir = self.ctx.package_dir();
        self
          .ctx
          .tool(Tool::Npx, &self.ctx.root)?
          .args(["conventional-changelog", "-p", "angular", "-i"])
          .arg(changelog_path.as_os_str())
          .args(["-s", "--pkg"])
          .arg(package_dir.as_os_str())
          .follow()?;
      }
      ChangelogGenerator::Native => self.write_native_changelog(git, &changelog_path)?,
    }

    if changelog_path.exists() {
      git.add(&changelog_path)?;
    }
    Ok(())
  }

  fn write_native_changelog(&self, git: &SystemGit, changelog_path: &Path) -> RelkitResult<()> {
    let previous_tag = git.last_tag(&self.ctx.config.release.tag_prefix)?;
    let commits = git.commits_since(previous_tag.as_deref())?;

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let mut changelog = Changelog::new(&self.plan.new, &self.tag, date);
    changelog.previous_tag = previous_tag;
    changelog.compare_url = PackageManifest::read_dir(&self.ctx.package_dir())?
      .repository_url()
      .map(|url| format!("{}/compare", url));

    let listed = commits
      .iter()
      .filter(|c| changelog.add_message(&c.message, &c.sha))
      .count();
    log::debug!("{} of {} commits are conventional", listed, commits.len());

    let existing = if changelog_path.exists() {
      fs::read_to_string(changelog_path).with_context(|| format!("Failed to read {}", changelog_path.display()))?
    } else {
      String::new()
    };

    let content = prepend_entry(&existing, &changelog.to_markdown());
    fs::write(changelog_path, content).with_context(|| format!("Failed to write {}", changelog_path.display()))
  }
}
