//! Federal Layer - baseline obligations that apply nationwide
//!
//! Employee thresholds follow the statutes' coverage rules:
//! - Title VII / ADA: 15 or more employees
//! - ADEA / COBRA: 20 or more employees
//! - FMLA / ACA employer mandate: 50 or more employees
//! - EEO-1 Component 1 report: 100 or more employees

use shared_types::{Priority, RuleLevel};

use super::Entry;

const ALL_TYPES: &[&str] = &[];

pub(crate) static ENTRIES: &[Entry] = &[
    Entry {
        key: "fed-ein",
        title: "Obtain a Federal Employer Identification Number (EIN)",
        description: "Businesses that have employees, operate as a corporation or partnership, or file employment, excise or alcohol/tobacco/firearms returns must obtain an EIN from the IRS.",
        authority: "Internal Revenue Service",
        level: RuleLevel::Federal,
        jurisdiction: "US",
        priority: Priority::Critical,
        cost: 0.0,
        time: "1 day",
        initial_deadline: "Before hiring employees or opening business bank accounts",
        recurring_deadline: None,
        steps: &[
            ("Confirm the responsible party and entity type", &[]),
            (
                "Apply online or by mail",
                &[("Form SS-4", "https://www.irs.gov/forms-pubs/about-form-ss-4")],
            ),
            ("Record the EIN on all federal tax filings", &[]),
        ],
        monetary_penalty: None,
        other_penalties: &["Returns and payroll deposits cannot be processed"],
        business_types: ALL_TYPES,
        employees: (None, None),
        industries: None,
        url: "https://www.irs.gov/businesses/small-businesses-self-employed/employer-id-numbers",
        tags: &["tax", "registration"],
    },
    Entry {
        key: "fed-income-tax-return",
        title: "File the annual federal business income tax return",
        description: "Every business files an annual federal income tax return matching its entity classification (Form 1120, 1120-S, 1065, or Schedule C).",
        authority: "Internal Revenue Service",
        level: RuleLevel::Federal,
        jurisdiction: "US",
        priority: Priority::Critical,
        cost: 1500.0,
        time: "1-2 weeks",
        initial_deadline: "15th day of the 3rd or 4th month after fiscal year end",
        recurring_deadline: Some("Annually"),
        steps: &[
            ("Close the books for the fiscal year", &[]),
            (
                "Prepare the return for the entity's tax classification",
                &[
                    ("Form 1120", "https://www.irs.gov/forms-pubs/about-form-1120"),
                    ("Form 1065", "https://www.irs.gov/forms-pubs/about-form-1065"),
                ],
            ),
            ("File and pay any balance due", &[]),
        ],
        monetary_penalty: Some(485.0),
        other_penalties: &[
            "Failure-to-file penalty of 5% of unpaid tax per month",
            "Interest on unpaid tax",
        ],
        business_types: ALL_TYPES,
        employees: (None, None),
        industries: None,
        url: "https://www.irs.gov/businesses/small-businesses-self-employed/business-taxes",
        tags: &["tax"],
    },
    Entry {
        key: "fed-form-941",
        title: "Deposit federal payroll taxes and file Form 941",
        description: "Employers withhold federal income tax, Social Security and Medicare from wages, deposit them on a monthly or semiweekly schedule and report them quarterly on Form 941.",
        authority: "Internal Revenue Service",
        level: RuleLevel::Federal,
        jurisdiction: "US",
        priority: Priority::Critical,
        cost: 1200.0,
        time: "Ongoing",
        initial_deadline: "End of the month following the first quarter with wages",
        recurring_deadline: Some("Quarterly"),
        steps: &[
            (
                "Collect a Form W-4 from every employee",
                &[("Form W-4", "https://www.irs.gov/forms-pubs/about-form-w-4")],
            ),
            ("Enroll in EFTPS and deposit withheld taxes on schedule", &[]),
            (
                "File the quarterly return",
                &[("Form 941", "https://www.irs.gov/forms-pubs/about-form-941")],
            ),
            (
                "Issue W-2s and file them with the SSA by January 31",
                &[("Form W-2", "https://www.irs.gov/forms-pubs/about-form-w-2")],
            ),
        ],
        monetary_penalty: Some(10000.0),
        other_penalties: &[
            "Trust fund recovery penalty assessed personally on responsible persons",
        ],
        business_types: ALL_TYPES,
        employees: (Some(1), None),
        industries: None,
        url: "https://www.irs.gov/forms-pubs/about-form-941",
        tags: &["tax", "payroll"],
    },
    Entry {
        key: "fed-futa",
        title: "Pay federal unemployment tax (FUTA) and file Form 940",
        description: "Employers paying $1,500 or more in wages in any quarter owe federal unemployment tax, reported annually on Form 940.",
        authority: "Internal Revenue Service",
        level: RuleLevel::Federal,
        jurisdiction: "US",
        priority: Priority::High,
        cost: 420.0,
        time: "1 day per year",
        initial_deadline: "January 31 following the first year with wages",
        recurring_deadline: Some("Annually"),
        steps: &[
            ("Track FUTA liability each quarter and deposit when it exceeds $500", &[]),
            (
                "File the annual return",
                &[("Form 940", "https://www.irs.gov/forms-pubs/about-form-940")],
            ),
        ],
        monetary_penalty: None,
        other_penalties: &["Failure-to-deposit penalties of up to 15%"],
        business_types: ALL_TYPES,
        employees: (Some(1), None),
        industries: None,
        url: "https://www.irs.gov/forms-pubs/about-form-940",
        tags: &["tax", "payroll"],
    },
    Entry {
        key: "fed-i9",
        title: "Verify employment eligibility with Form I-9",
        description: "Employers must complete Form I-9 for every new hire within three business days of the start of work and retain it for inspection.",
        authority: "U.S. Citizenship and Immigration Services",
        level: RuleLevel::Federal,
        jurisdiction: "US",
        priority: Priority::High,
        cost: 0.0,
        time: "30 minutes per hire",
        initial_deadline: "Within 3 business days of each hire",
        recurring_deadline: Some("Each new hire"),
        steps: &[
            (
                "Have the employee complete Section 1 on the first day of work",
                &[("Form I-9", "https://www.uscis.gov/i-9")],
            ),
            ("Examine identity and work authorization documents and complete Section 2", &[]),
            (
                "Retain forms for 3 years after hire or 1 year after separation, whichever is later",
                &[],
            ),
        ],
        monetary_penalty: Some(2861.0),
        other_penalties: &["Per-form paperwork penalties", "Debarment from federal contracts"],
        business_types: ALL_TYPES,
        employees: (Some(1), None),
        industries: None,
        url: "https://www.uscis.gov/i-9",
        tags: &["employment", "immigration"],
    },
    Entry {
        key: "fed-flsa",
        title: "Pay federal minimum wage and overtime and keep FLSA records",
        description: "Covered employers must pay at least the federal minimum wage, overtime at one and one-half times the regular rate for hours over 40 per week, display the FLSA poster and keep payroll records for three years.",
        authority: "U.S. Department of Labor, Wage and Hour Division",
        level: RuleLevel::Federal,
        jurisdiction: "US",
        priority: Priority::High,
        cost: 250.0,
        time: "Ongoing",
        initial_deadline: "First payroll",
        recurring_deadline: Some("Every pay period"),
        steps: &[
            ("Classify each worker as exempt or non-exempt", &[]),
            ("Track hours worked for non-exempt employees", &[]),
            (
                "Display the Employee Rights poster",
                &[("FLSA Minimum Wage Poster", "https://www.dol.gov/agencies/whd/posters/flsa")],
            ),
        ],
        monetary_penalty: Some(2451.0),
        other_penalties: &["Back wages plus equal liquidated damages"],
        business_types: ALL_TYPES,
        employees: (Some(1), None),
        industries: None,
        url: "https://www.dol.gov/agencies/whd/flsa",
        tags: &["employment", "wages"],
    },
    Entry {
        key: "fed-osha-recordkeeping",
        title: "Maintain OSHA injury and illness records",
        description: "Employers with more than ten employees in non-exempt industries must record work-related injuries and illnesses on OSHA Forms 300, 300A and 301 and post the annual summary.",
        authority: "Occupational Safety and Health Administration",
        level: RuleLevel::Federal,
        jurisdiction: "US",
        priority: Priority::Medium,
        cost: 300.0,
        time: "Ongoing",
        initial_deadline: "Within 7 days of a recordable incident",
        recurring_deadline: Some("Post Form 300A from February 1 to April 30"),
        steps: &[
            (
                "Record each recordable injury or illness",
                &[
                    ("OSHA Form 300", "https://www.osha.gov/recordkeeping/forms"),
                    ("OSHA Form 301", "https://www.osha.gov/recordkeeping/forms"),
                ],
            ),
            (
                "Post the annual summary",
                &[("OSHA Form 300A", "https://www.osha.gov/recordkeeping/forms")],
            ),
        ],
        monetary_penalty: Some(16131.0),
        other_penalties: &["Citations and inspection follow-up"],
        business_types: ALL_TYPES,
        employees: (Some(11), None),
        industries: None,
        url: "https://www.osha.gov/recordkeeping",
        tags: &["safety", "employment"],
    },
    Entry {
        key: "fed-title-vii",
        title: "Comply with Title VII and ADA anti-discrimination requirements",
        description: "Employers with 15 or more employees may not discriminate on the basis of race, color, religion, sex, national origin or disability, must provide reasonable accommodation and must post the EEO notice.",
        authority: "Equal Employment Opportunity Commission",
        level: RuleLevel::Federal,
        jurisdiction: "US",
        priority: Priority::High,
        cost: 500.0,
        time: "Ongoing",
        initial_deadline: "On reaching 15 employees",
        recurring_deadline: None,
        steps: &[
            (
                "Post the Know Your Rights notice",
                &[("EEO Poster", "https://www.eeoc.gov/poster")],
            ),
            ("Adopt written anti-discrimination and accommodation policies", &[]),
            ("Retain personnel records for at least one year", &[]),
        ],
        monetary_penalty: Some(300000.0),
        other_penalties: &["Back pay and reinstatement orders"],
        business_types: ALL_TYPES,
        employees: (Some(15), None),
        industries: None,
        url: "https://www.eeoc.gov/employers",
        tags: &["employment", "discrimination"],
    },
    Entry {
        key: "fed-adea",
        title: "Comply with the Age Discrimination in Employment Act",
        description: "Employers with 20 or more employees may not discriminate against applicants or employees aged 40 or older.",
        authority: "Equal Employment Opportunity Commission",
        level: RuleLevel::Federal,
        jurisdiction: "US",
        priority: Priority::Medium,
        cost: 0.0,
        time: "Ongoing",
        initial_deadline: "On reaching 20 employees",
        recurring_deadline: None,
        steps: &[("Review hiring, promotion and separation practices for age bias", &[])],
        monetary_penalty: None,
        other_penalties: &["Back pay and liquidated damages for willful violations"],
        business_types: ALL_TYPES,
        employees: (Some(20), None),
        industries: None,
        url: "https://www.eeoc.gov/age-discrimination",
        tags: &["employment", "discrimination"],
    },
    Entry {
        key: "fed-cobra",
        title: "Offer COBRA continuation coverage",
        description: "Employers with 20 or more employees that sponsor a group health plan must offer continuation coverage to employees and dependents who lose coverage after a qualifying event.",
        authority: "U.S. Department of Labor, Employee Benefits Security Administration",
        level: RuleLevel::Federal,
        jurisdiction: "US",
        priority: Priority::Medium,
        cost: 400.0,
        time: "Per qualifying event",
        initial_deadline: "Notify the plan administrator within 30 days of a qualifying event",
        recurring_deadline: Some("Each qualifying event"),
        steps: &[
            ("Provide the general COBRA notice to new plan participants", &[]),
            ("Send election notices within 14 days of administrator notification", &[]),
        ],
        monetary_penalty: Some(110.0),
        other_penalties: &["Excise tax of $100 per beneficiary per day of noncompliance"],
        business_types: ALL_TYPES,
        employees: (Some(20), None),
        industries: None,
        url: "https://www.dol.gov/general/topic/health-plans/cobra",
        tags: &["benefits", "employment"],
    },
    Entry {
        key: "fed-fmla",
        title: "Provide Family and Medical Leave Act leave",
        description: "Employers with 50 or more employees must provide eligible employees up to 12 weeks of job-protected unpaid leave per year and post the FMLA notice.",
        authority: "U.S. Department of Labor, Wage and Hour Division",
        level: RuleLevel::Federal,
        jurisdiction: "US",
        priority: Priority::High,
        cost: 800.0,
        time: "Ongoing",
        initial_deadline: "On reaching 50 employees",
        recurring_deadline: None,
        steps: &[
            (
                "Post the FMLA notice",
                &[("FMLA Poster", "https://www.dol.gov/agencies/whd/posters/fmla")],
            ),
            ("Add FMLA rights to the employee handbook", &[]),
            (
                "Respond to leave requests with eligibility notices",
                &[("Form WH-381", "https://www.dol.gov/agencies/whd/forms/wh-381")],
            ),
        ],
        monetary_penalty: Some(204.0),
        other_penalties: &["Lost wages, benefits and liquidated damages"],
        business_types: ALL_TYPES,
        employees: (Some(50), None),
        industries: None,
        url: "https://www.dol.gov/agencies/whd/fmla",
        tags: &["employment", "leave"],
    },
    Entry {
        key: "fed-aca-employer",
        title: "Meet ACA employer shared responsibility and reporting",
        description: "Applicable large employers (50 or more full-time equivalent employees) must offer affordable minimum essential coverage to full-time employees and file Forms 1094-C and 1095-C.",
        authority: "Internal Revenue Service",
        level: RuleLevel::Federal,
        jurisdiction: "US",
        priority: Priority::High,
        cost: 2500.0,
        time: "2-4 weeks per year",
        initial_deadline: "Year after reaching 50 full-time equivalents",
        recurring_deadline: Some("Annually; furnish 1095-C by early March"),
        steps: &[
            ("Calculate full-time equivalent headcount for the prior year", &[]),
            ("Offer affordable minimum value coverage to full-time employees", &[]),
            (
                "Furnish and file information returns",
                &[
                    ("Form 1094-C", "https://www.irs.gov/forms-pubs/about-form-1094-c"),
                    ("Form 1095-C", "https://www.irs.gov/forms-pubs/about-form-1095-c"),
                ],
            ),
        ],
        monetary_penalty: Some(2900.0),
        other_penalties: &["Per-employee assessable payment under section 4980H"],
        business_types: ALL_TYPES,
        employees: (Some(50), None),
        industries: None,
        url: "https://www.irs.gov/affordable-care-act/employers",
        tags: &["benefits", "tax"],
    },
    Entry {
        key: "fed-eeo1",
        title: "File the annual EEO-1 Component 1 report",
        description: "Private employers with 100 or more employees must submit workforce demographic data to the EEOC each year.",
        authority: "Equal Employment Opportunity Commission",
        level: RuleLevel::Federal,
        jurisdiction: "US",
        priority: Priority::Medium,
        cost: 600.0,
        time: "1 week per year",
        initial_deadline: "EEOC-announced filing deadline",
        recurring_deadline: Some("Annually"),
        steps: &[
            ("Collect voluntary self-identification data", &[]),
            (
                "Submit through the EEO-1 online filing system",
                &[("EEO-1 Component 1", "https://www.eeocdata.org/eeo1")],
            ),
        ],
        monetary_penalty: None,
        other_penalties: &["EEOC may seek a court order compelling filing"],
        business_types: ALL_TYPES,
        employees: (Some(100), None),
        industries: None,
        url: "https://www.eeoc.gov/data/eeo-data-collections",
        tags: &["employment", "reporting"],
    },
    Entry {
        key: "fed-ttb-permit",
        title: "Obtain a TTB permit or brewer's notice before producing alcohol",
        description: "Breweries, wineries and distilleries must qualify with the Alcohol and Tobacco Tax and Trade Bureau before production and file periodic operations and excise tax reports.",
        authority: "Alcohol and Tobacco Tax and Trade Bureau",
        level: RuleLevel::Federal,
        jurisdiction: "US",
        priority: Priority::Critical,
        cost: 1000.0,
        time: "60-120 days",
        initial_deadline: "Before production begins",
        recurring_deadline: Some("Monthly or quarterly excise tax returns"),
        steps: &[
            ("Register in Permits Online", &[("Permits Online", "https://www.ttb.gov/ponl")]),
            ("File excise tax returns", &[("TTB F 5000.24", "https://www.ttb.gov/forms")]),
        ],
        monetary_penalty: Some(10000.0),
        other_penalties: &["Seizure of product", "Criminal prosecution"],
        business_types: ALL_TYPES,
        employees: (None, None),
        industries: Some(&["brewery", "winery", "distillery", "alcohol"]),
        url: "https://www.ttb.gov/business-central",
        tags: &["alcohol", "permit", "tax"],
    },
];
