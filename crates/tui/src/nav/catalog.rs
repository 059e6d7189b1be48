//! Static role-scoped menu tables.
//!
//! Order is meaningful: the first top-level item is the default page, and
//! sections render in the order listed. Item ids are unique per role.

use lms_types::{MenuDefinition, MenuEntry, MenuItem, MenuSection, Role};

const STUDENT_LEARNING: &[MenuItem] = &[
    MenuItem {
        id: "courses",
        icon: "fa-book",
        label_key: "nav.courses",
        target: "pages/courses.html",
    },
    MenuItem {
        id: "my-courses",
        icon: "fa-book-open",
        label_key: "nav.myCourses",
        target: "pages/courses.html",
    },
    MenuItem {
        id: "progress",
        icon: "fa-chart-bar",
        label_key: "nav.progress",
        target: "pages/progress.html",
    },
];

const STUDENT_ASSESSMENT: &[MenuItem] = &[
    MenuItem {
        id: "quizzes",
        icon: "fa-file-alt",
        label_key: "nav.quizzes",
        target: "pages/student-quizzes.html",
    },
    MenuItem {
        id: "results",
        icon: "fa-trophy",
        label_key: "nav.results",
        target: "pages/quiz-results.html",
    },
];

const STUDENT_ACCOUNT: &[MenuItem] = &[
    MenuItem {
        id: "certificates",
        icon: "fa-certificate",
        label_key: "nav.certificates",
        target: "pages/certificates.html",
    },
    MenuItem {
        id: "messaging",
        icon: "fa-comments",
        label_key: "nav.messaging",
        target: "pages/messaging.html",
    },
    MenuItem {
        id: "profile",
        icon: "fa-user",
        label_key: "nav.profile",
        target: "pages/profile-student.html",
    },
];

const STUDENT_ENTRIES: &[MenuEntry] = &[
    MenuEntry::Item(MenuItem {
        id: "dashboard",
        icon: "fa-chart-line",
        label_key: "nav.dashboard",
        target: "pages/dashboard-student.html",
    }),
    MenuEntry::Section(MenuSection {
        title_key: "nav.sections.learning",
        items: STUDENT_LEARNING,
    }),
    MenuEntry::Section(MenuSection {
        title_key: "nav.sections.assessment",
        items: STUDENT_ASSESSMENT,
    }),
    MenuEntry::Section(MenuSection {
        title_key: "nav.sections.account",
        items: STUDENT_ACCOUNT,
    }),
];

const TEACHER_COURSE_MANAGEMENT: &[MenuItem] = &[
    MenuItem {
        id: "courses",
        icon: "fa-book",
        label_key: "nav.courses",
        target: "pages/courses.html",
    },
    MenuItem {
        id: "lesson-builder",
        icon: "fa-chalkboard",
        label_key: "nav.lessonBuilder",
        target: "pages/lesson-builder.html",
    },
    MenuItem {
        id: "lesson-analytics",
        icon: "fa-chart-line",
        label_key: "nav.lessonAnalytics",
        target: "pages/lesson-analytics.html",
    },
    MenuItem {
        id: "categories",
        icon: "fa-folder",
        label_key: "nav.categories",
        target: "pages/categories.html",
    },
];

const TEACHER_STUDENTS: &[MenuItem] = &[
    MenuItem {
        id: "students",
        icon: "fa-users",
        label_key: "nav.students",
        target: "pages/students.html",
    },
    MenuItem {
        id: "enrollment",
        icon: "fa-clipboard-list",
        label_key: "nav.enrollment",
        target: "pages/enrollments.html",
    },
    MenuItem {
        id: "attendance",
        icon: "fa-calendar-check",
        label_key: "nav.attendance",
        target: "pages/class-attendance.html",
    },
];

const TEACHER_ASSESSMENT: &[MenuItem] = &[
    MenuItem {
        id: "quiz-builder",
        icon: "fa-hammer",
        label_key: "nav.quizBuilder",
        target: "pages/quiz-builder.html",
    },
    MenuItem {
        id: "quiz-results",
        icon: "fa-chart-line",
        label_key: "nav.quizResults",
        target: "pages/teacher-quiz-results.html",
    },
    MenuItem {
        id: "quiz-templates",
        icon: "fa-clipboard-check",
        label_key: "nav.quizTemplates",
        target: "pages/quiz-templates.html",
    },
    MenuItem {
        id: "quiz-analytics",
        icon: "fa-chart-bar",
        label_key: "nav.quizAnalytics",
        target: "pages/quiz-analytics.html",
    },
    MenuItem {
        id: "quiz-monitoring",
        icon: "fa-desktop",
        label_key: "nav.quizMonitoring",
        target: "pages/quiz-monitoring.html",
    },
    MenuItem {
        id: "integration-tests",
        icon: "fa-vial",
        label_key: "nav.integrationTests",
        target: "pages/integration-tests.html",
    },
];

const TEACHER_ACCOUNT: &[MenuItem] = &[
    MenuItem {
        id: "messaging",
        icon: "fa-comments",
        label_key: "nav.messaging",
        target: "pages/messaging.html",
    },
    MenuItem {
        id: "profile",
        icon: "fa-user",
        label_key: "nav.profile",
        target: "pages/profile-teacher.html",
    },
];

const TEACHER_ENTRIES: &[MenuEntry] = &[
    MenuEntry::Item(MenuItem {
        id: "dashboard",
        icon: "fa-chart-line",
        label_key: "nav.dashboard",
        target: "pages/dashboard-teacher.html",
    }),
    MenuEntry::Section(MenuSection {
        title_key: "nav.sections.courseManagement",
        items: TEACHER_COURSE_MANAGEMENT,
    }),
    MenuEntry::Section(MenuSection {
        title_key: "nav.sections.students",
        items: TEACHER_STUDENTS,
    }),
    MenuEntry::Section(MenuSection {
        title_key: "nav.sections.assessment",
        items: TEACHER_ASSESSMENT,
    }),
    MenuEntry::Section(MenuSection {
        title_key: "nav.sections.account",
        items: TEACHER_ACCOUNT,
    }),
];

const ADMIN_USER_MANAGEMENT: &[MenuItem] = &[
    MenuItem {
        id: "users",
        icon: "fa-users",
        label_key: "nav.users",
        target: "pages/users.html",
    },
    MenuItem {
        id: "permissions",
        icon: "fa-user-shield",
        label_key: "nav.permissions",
        target: "pages/permissions.html",
    },
    MenuItem {
        id: "classes",
        icon: "fa-school",
        label_key: "nav.classes",
        target: "pages/classes.html",
    },
    MenuItem {
        id: "activity-logs",
        icon: "fa-clipboard-list",
        label_key: "nav.activityLogs",
        target: "pages/logs.html",
    },
    MenuItem {
        id: "integration-tests",
        icon: "fa-vial",
        label_key: "nav.integrationTests",
        target: "pages/integration-tests.html",
    },
];

const ADMIN_COURSE_MANAGEMENT: &[MenuItem] = &[
    MenuItem {
        id: "courses",
        icon: "fa-book",
        label_key: "nav.courses",
        target: "pages/courses.html",
    },
    MenuItem {
        id: "lesson-builder",
        icon: "fa-chalkboard",
        label_key: "nav.lessonBuilder",
        target: "pages/lesson-builder.html",
    },
    MenuItem {
        id: "lesson-analytics",
        icon: "fa-chart-line",
        label_key: "nav.lessonAnalytics",
        target: "pages/lesson-analytics.html",
    },
    MenuItem {
        id: "categories",
        icon: "fa-folder",
        label_key: "nav.categories",
        target: "pages/categories.html",
    },
    MenuItem {
        id: "enrollments",
        icon: "fa-clipboard-list",
        label_key: "nav.enrollment",
        target: "pages/enrollments.html",
    },
    MenuItem {
        id: "attendance",
        icon: "fa-calendar-check",
        label_key: "nav.attendance",
        target: "pages/class-attendance.html",
    },
];

const ADMIN_LEARNING: &[MenuItem] = &[
    MenuItem {
        id: "progress",
        icon: "fa-chart-bar",
        label_key: "nav.progress",
        target: "pages/progress.html",
    },
    MenuItem {
        id: "certificates",
        icon: "fa-certificate",
        label_key: "nav.certificates",
        target: "pages/certificates.html",
    },
];

const ADMIN_ASSESSMENT: &[MenuItem] = &[
    MenuItem {
        id: "quiz-builder",
        icon: "fa-hammer",
        label_key: "nav.quizBuilder",
        target: "pages/quiz-builder.html",
    },
    MenuItem {
        id: "quizzes",
        icon: "fa-file-alt",
        label_key: "nav.quizzes",
        target: "pages/quizzes.html",
    },
    MenuItem {
        id: "quiz-results",
        icon: "fa-chart-line",
        label_key: "nav.quizResults",
        target: "pages/quiz-results.html",
    },
    MenuItem {
        id: "quiz-templates",
        icon: "fa-clipboard-check",
        label_key: "nav.quizTemplates",
        target: "pages/quiz-templates.html",
    },
    MenuItem {
        id: "quiz-analytics",
        icon: "fa-chart-bar",
        label_key: "nav.quizAnalytics",
        target: "pages/quiz-analytics.html",
    },
    MenuItem {
        id: "quiz-monitoring",
        icon: "fa-desktop",
        label_key: "nav.quizMonitoring",
        target: "pages/quiz-monitoring.html",
    },
];

const ADMIN_SYSTEM: &[MenuItem] = &[
    MenuItem {
        id: "settings",
        icon: "fa-cogs",
        label_key: "nav.settings",
        target: "pages/settings.html",
    },
    MenuItem {
        id: "reports",
        icon: "fa-chart-bar",
        label_key: "nav.reports",
        target: "pages/reports.html",
    },
];

const ADMIN_ACCOUNT: &[MenuItem] = &[
    MenuItem {
        id: "messaging",
        icon: "fa-comments",
        label_key: "nav.messaging",
        target: "pages/messaging.html",
    },
    MenuItem {
        id: "profile",
        icon: "fa-user",
        label_key: "nav.profile",
        target: "pages/profile-admin.html",
    },
];

const ADMIN_ENTRIES: &[MenuEntry] = &[
    MenuEntry::Item(MenuItem {
        id: "dashboard",
        icon: "fa-chart-line",
        label_key: "nav.dashboard",
        target: "pages/dashboard-admin.html",
    }),
    MenuEntry::Section(MenuSection {
        title_key: "nav.sections.userManagement",
        items: ADMIN_USER_MANAGEMENT,
    }),
    MenuEntry::Section(MenuSection {
        title_key: "nav.sections.courseManagement",
        items: ADMIN_COURSE_MANAGEMENT,
    }),
    MenuEntry::Section(MenuSection {
        title_key: "nav.sections.learning",
        items: ADMIN_LEARNING,
    }),
    MenuEntry::Section(MenuSection {
        title_key: "nav.sections.assessment",
        items: ADMIN_ASSESSMENT,
    }),
    MenuEntry::Section(MenuSection {
        title_key: "nav.sections.system",
        items: ADMIN_SYSTEM,
    }),
    MenuEntry::Section(MenuSection {
        title_key: "nav.sections.account",
        items: ADMIN_ACCOUNT,
    }),
];

pub const STUDENT_MENU: MenuDefinition = MenuDefinition::new(STUDENT_ENTRIES);
pub const TEACHER_MENU: MenuDefinition = MenuDefinition::new(TEACHER_ENTRIES);
pub const ADMIN_MENU: MenuDefinition = MenuDefinition::new(ADMIN_ENTRIES);

/// Menu for `role`; the empty definition when nobody is signed in.
pub fn menu_for(role: Option<Role>) -> &'static MenuDefinition {
    match role {
        Some(Role::Student) => &STUDENT_MENU,
        Some(Role::Teacher) => &TEACHER_MENU,
        Some(Role::Admin) => &ADMIN_MENU,
        None => &MenuDefinition::EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_menus_have_unique_ids() {
        for role in Role::ALL {
            assert!(menu_for(Some(role)).duplicate_ids().is_empty(), "duplicate ids for {role}");
        }
    }

    #[test]
    fn every_role_defaults_to_dashboard() {
        for role in Role::ALL {
            assert_eq!(menu_for(Some(role)).default_item().map(|item| item.id), Some("dashboard"));
        }
    }

    #[test]
    fn item_counts_per_role() {
        assert_eq!(STUDENT_MENU.item_count(), 9);
        assert_eq!(TEACHER_MENU.item_count(), 16);
        assert_eq!(ADMIN_MENU.item_count(), 24);
        assert!(menu_for(None).is_empty());
    }

    #[test]
    fn teacher_assessment_lists_quiz_analytics_once() {
        let analytics = TEACHER_MENU
            .locations()
            .filter(|location| location.item.id == "quiz-analytics")
            .count();
        assert_eq!(analytics, 1);
    }
}
